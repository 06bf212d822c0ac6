/// Station tag written on every point
pub const DEFAULT_STATION_NAME: &str = "Mein Zuhause (Wetterstation Innensensor)";

/// Tag keys
pub const STATION_TAG: &str = "station";
pub const MODULE_TAG: &str = "module";

/// Name of the single field carried by each point
pub const VALUE_FIELD: &str = "value";

/// Export file layout
pub const CSV_DELIMITER: u8 = b';';
pub const HEADER_ROWS: usize = 3;
pub const MODULE_NAME_COLUMN: usize = 3;
pub const DATA_OFFSET: usize = 2;
pub const MIN_DATA_COLUMNS: usize = 3;
pub const EXPORT_FILE_PATTERN: &str = "*.csv";

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// InfluxDB defaults
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const WRITE_ENDPOINT: &str = "/api/v2/write";
pub const WRITE_PRECISION: &str = "s";
pub const UNPROCESSABLE_STATUS: u16 = 422;
