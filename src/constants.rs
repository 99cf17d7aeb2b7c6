//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "Reading Atlas";

/// Default page heading.
pub const APP_TITLE: &str = "MIB-6124: Defining Institutions";

/// Port used when neither the config file nor `PORT` sets one.
pub const DEFAULT_PORT: u16 = 8091;
