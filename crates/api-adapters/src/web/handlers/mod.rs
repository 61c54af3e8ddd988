pub(crate) mod forums;
pub(crate) mod posts;
pub(crate) mod service;
pub(crate) mod threads;
pub(crate) mod users;

pub(crate) type ApiResult<T> = Result<T, super::ApiError>;
