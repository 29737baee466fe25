pub mod http_client;

#[cfg(test)]
pub mod stub_server;
