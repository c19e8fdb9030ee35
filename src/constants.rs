/// Constants describing the recorded signal and its time base.
pub mod signal {
    /// Seconds in one hour; segments span exactly one hour of recording.
    pub const SECONDS_PER_HOUR: u32 = 3600;
    /// Seconds in one minute.
    pub const SECONDS_PER_MINUTE: u32 = 60;
    /// The only sampling step (seconds per sample) supported by the recorded corpus.
    pub const SUPPORTED_STEP: u32 = 4;
}

/// Constants used by the segment corpus builder.
pub mod corpus {
    /// Separator between channel name and hour index in segment identifiers (`reg_3`).
    pub const SEGMENT_ID_SEPARATOR: &str = "_";
    /// Offset added to the last synthetic hour coordinate before flooring it into
    /// an hour count, so a trailing window of at least half an hour is still visited.
    pub const HOUR_COUNT_ROUNDING: f64 = 0.5;
}

/// Constants used by the continuity-preserving stitcher.
pub mod stitcher {
    /// Draws provisioned per whole pass over the corpus before stitching gives up.
    pub const DRAW_BUDGET_MULTIPLIER: usize = 100;
}

/// Constants used by the generator configuration and storage collaborator.
pub mod dispatch {
    /// Default total sequence duration, in seconds.
    pub const DEFAULT_LENGTH_SECONDS: u64 = 60 * 60;
    /// Environment variable overriding the default corpus table location.
    pub const DB_PATH_ENV: &str = "REGDISPATCH_DB";
    /// Default corpus table location, relative to the working directory.
    pub const DEFAULT_DB_PATH: &str = "data/FrequencyRegulationData.csv";
    /// Default field delimiter of the corpus table.
    pub const DEFAULT_DELIMITER: char = ',';
    /// Source id reported for tables loaded from a delimited file.
    pub const DELIMITED_SOURCE_ID: &str = "delimited_table";
}

/// Constants used by the sequence accessor views.
pub mod accessor {
    /// Value label attached to batch views.
    pub const VALUE_LABEL: &str = "Dispatch [kW]";
    /// Index label for views in seconds.
    pub const TIME_LABEL_SECONDS: &str = "Time [s]";
    /// Index label for views in minutes.
    pub const TIME_LABEL_MINUTES: &str = "Time [min]";
    /// Index label for views in hours.
    pub const TIME_LABEL_HOURS: &str = "Time [h]";
    /// Selector string for the hour view.
    pub const SELECTOR_HOUR: &str = "hour";
    /// Selector string for the minute view.
    pub const SELECTOR_MINUTE: &str = "minute";
    /// Human-readable list of accepted selectors, used in error messages.
    pub const ALLOWED_SELECTORS: &str = r#"[None, "hour", "minute"]"#;
}

/// Diagnostic messages emitted through the diagnostics sink.
pub mod messages {
    /// Warning emitted when an unsupported step size is requested.
    pub const STEP_FALLBACK: &str =
        r#"The "step" argument must be 4 in this version. Falling back to 4."#;
    /// Warning emitted when regulation-up generation is disabled.
    pub const REG_UP_FALLBACK: &str =
        r#"The "reg_up" argument must be true in this version. Falling back to true."#;
    /// Warning emitted when regulation-down generation is disabled.
    pub const REG_DN_FALLBACK: &str =
        r#"The "reg_dn" argument must be true in this version. Falling back to true."#;
    /// Warning emitted when the assembled mean is outside the corpus interquartile band.
    pub const MEAN_OUT_OF_RANGE: &str =
        "Mean of sequence out of range, please use another seed or increase sequence length.";
}
