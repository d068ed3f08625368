pub mod fakes;

#[allow(unused_imports)]
pub use fakes::{FailingChapterStore, FakePlayer, FixedSettings, InMemoryChapterStore};

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
