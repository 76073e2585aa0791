//! Integration tests driving the built binary against throwaway git repositories

mod helpers;
mod test_install;
mod test_sample;
mod test_validate;
