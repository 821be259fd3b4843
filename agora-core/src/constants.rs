use std::time::Duration;

/// Default timeout for remote document calls.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Sign-in flows wait on the user, so they get a much longer budget.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

/// Provider executables are named `agora-provider-<name>`.
pub const PROVIDER_BINARY_PREFIX: &str = "agora-provider-";

/// Calendar date format used for storage and the remote wire format.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format accepted when a user adds an event by hand.
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format used when showing an event.
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";
