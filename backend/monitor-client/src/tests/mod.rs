mod auth;
mod classify;
mod config;
mod retry;
