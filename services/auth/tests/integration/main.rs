mod credential_test;
mod helpers;
mod store_test;
