mod calc;
mod error_assert;
mod usage_store;

pub use calc::{
    TestCalc,
    TestCombatant,
};
pub use error_assert::{
    assert_error_message,
    assert_error_message_contains,
};
pub use usage_store::TestUsageStore;
