pub mod accessibility;
pub mod config;
pub mod form;
pub mod logging;
pub mod prelude;
pub mod timing;

#[cfg(test)]
mod test_public_api;
