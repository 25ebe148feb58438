//! Export defaults shared by the formatter and the configuration layer.

/// Product name written into the ICS `PRODID` line.
pub const DEFAULT_PRODUCT_ID: &str = "EventMasterHub";

/// Domain appended to event ids to form ICS UIDs.
pub const DEFAULT_UID_DOMAIN: &str = "eventmasterhub.com";

/// Event length used when a record has no explicit end.
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 120;

/// Same default, in the humantime syntax used by the config file.
pub const DEFAULT_EVENT_DURATION: &str = "2h";

/// IANA zone for naive timestamps and CSV display.
pub const DEFAULT_TIMEZONE: &str = "UTC";
