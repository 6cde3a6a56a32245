mod client_tests {
    pub mod helpers;

    mod auth;
    mod cancellation;
    mod decode;
    mod retry;
}

mod config_tests {
    mod load;
}
