/// Timezone identifier stored for UTC events.
///
/// All-day events store the same identifier; the `all_day` column tells them apart.
pub const TIMEZONE_UTC: &str = "UTC";

/// Separator between the timezone identifier and the values of a recurrence date list.
pub const RECURRENCE_LIST_TZID_SEPARATOR: char = ';';

/// Separator between the values of a recurrence date list.
pub const RECURRENCE_LIST_VALUE_SEPARATOR: char = ',';

/// Separator between the rules of a stored recurrence rule list.
pub const RECURRENCE_RULE_SEPARATOR: char = '\n';

/// Extended property namespace for values the event row cannot represent.
pub const UNKNOWN_PROPERTY_PREFIX: &str = "unknown-property";
pub const UNKNOWN_PROPERTY_NAME: &str = const_str::concat!(UNKNOWN_PROPERTY_PREFIX, ".v2");

/// Extended property holding the event categories.
pub const CATEGORIES_PROPERTY_NAME: &str = "categories";
/// Separator between stored categories.
pub const CATEGORIES_SEPARATOR: char = '\\';

/// Extended property holding the event URL.
pub const URL_PROPERTY_NAME: &str = "url";

/// Default byte budget of a single storage transaction.
pub const DEFAULT_TRANSACTION_BUDGET_BYTES: usize = 1024 * 1024;
