use crate::client::retry::RetryPolicy;
use crate::config::ClientConfig;

use std::time::Duration;

/// **VALUE**: Verifies the backoff curve doubles from the initial delay and is capped.
///
/// **BUG THIS CATCHES**: Would catch jitter creeping back in (delays shrinking between
/// retries) or the cap not being honoured.
#[test]
fn given_policy_when_scheduling_then_delays_double_up_to_the_cap() {
    // GIVEN
    let config = ClientConfig::new("https://api.example.com")
        .with_retry_delays(Duration::from_millis(100), Duration::from_millis(500));
    let policy = RetryPolicy::from_config(&config);

    // WHEN
    let mut schedule = policy.schedule();
    let delays: Vec<Duration> = (0..5).map(|_| schedule.next_delay()).collect();

    // THEN
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(500),
            Duration::from_millis(500),
        ]
    );
}

#[test]
fn given_two_schedules_when_created_then_each_starts_from_the_initial_delay() {
    let policy = RetryPolicy::from_config(&ClientConfig::new("https://api.example.com"));

    let mut first = policy.schedule();
    first.next_delay();
    first.next_delay();
    let mut second = policy.schedule();

    assert_eq!(second.next_delay(), Duration::from_millis(200));
}

#[test]
fn given_zero_retries_when_building_policy_then_single_attempt() {
    let config = ClientConfig::new("https://api.example.com").with_max_retries(0);

    assert_eq!(RetryPolicy::from_config(&config).max_attempts(), 1);
}
