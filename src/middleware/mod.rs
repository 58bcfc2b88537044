pub mod client_storage;
