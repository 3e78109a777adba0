
pub use mock_outlet::*;
pub use signal_helpers::*;
pub use test_client::*;
