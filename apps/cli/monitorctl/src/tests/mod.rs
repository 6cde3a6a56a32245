mod error;
mod logger;
mod request;
