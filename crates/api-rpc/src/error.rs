//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes. The message is always the
//! human-readable text a form can show as-is.

use claimq_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const CONFLICT: i32 = 4002;
    pub const NO_CONTAINER: i32 = 4004;
    pub const SECURITY_CHECK_FAILED: i32 = 4010;
    pub const PERMISSION_DENIED: i32 = 4030;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_ERROR: i32 = 5001;
    pub const CREATION_FAILED: i32 = 5020;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::SecurityCheckFailed(_) => code::SECURITY_CHECK_FAILED,
        AppError::PermissionDenied(_) => code::PERMISSION_DENIED,
        AppError::Validation(_) | AppError::Serialization(_) => code::VALIDATION_ERROR,
        AppError::CreationFailed(_) => code::CREATION_FAILED,
        AppError::NoContainerIdentity => code::NO_CONTAINER,
        AppError::Conflict(_) => code::CONFLICT,
        AppError::Storage(_) => code::STORAGE_ERROR,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.user_message(), None::<()>)
}
