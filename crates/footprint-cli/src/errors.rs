use console::style;
use footprint_core::FootprintError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Map a pipeline error to a message with remediation hints
pub fn from_footprint(error: &FootprintError) -> CliError {
    match error {
        FootprintError::InvalidCoordinate { reason } => CliError::new("Invalid coordinates")
            .with_context(reason.clone())
            .with_suggestion("Latitude must be between -90 and 90")
            .with_suggestion("Longitude must be between -180 and 180")
            .with_help("Run: footprint calc --help"),

        FootprintError::LocationNotFound { query } => CliError::new("Location not found")
            .with_context(format!("No match for '{}'.", query))
            .with_suggestion("Try a more specific address, e.g. include the city")
            .with_suggestion("Or pass coordinates: footprint calc --lat 37.4221 --lon -122.0841"),

        FootprintError::GeocodingFailed { query, reason } => {
            CliError::new("Geocoding service unavailable")
                .with_context(format!("Could not geocode '{}'.\n\nError: {}", query, reason))
                .with_suggestion("Check your network connection")
                .with_suggestion("Or pass coordinates directly with --lat/--lon")
                .with_suggestion("Or point FOOTPRINT_GEOCODER_URL at another Nominatim instance")
        }

        FootprintError::InvalidRadius { value, reason } => {
            CliError::new(format!("Invalid radius: {}", value))
                .with_context(reason.clone())
                .with_suggestion("Pick a radius within the configured bounds")
                .with_help("Run: footprint config")
        }

        FootprintError::FetchFailed { endpoint, attempts, cause } => {
            CliError::new("Could not fetch buildings from Overpass")
                .with_context(format!(
                    "Endpoint: {}\nAttempts: {}\n\nLast error: {}",
                    endpoint, attempts, cause
                ))
                .with_suggestion("Retry in a minute; public Overpass servers rate-limit heavy use")
                .with_suggestion("Use a smaller radius to reduce the query size")
                .with_suggestion("Try the mirrors: --rotate-mirrors")
                .with_help("Run: footprint mirrors")
        }

        FootprintError::ConfigInvalid { key, reason } => {
            CliError::new(format!("Invalid configuration: {}", key))
                .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
                .with_suggestion("Check footprint.toml for syntax errors")
                .with_suggestion("Check FOOTPRINT_* environment variables")
                .with_help("Run: footprint config")
        }

        FootprintError::Io(e) => CliError::new("I/O error")
            .with_context(format!("Error: {}", e))
            .with_suggestion("Check file paths and permissions"),

        FootprintError::Serialization(msg) => CliError::new("Serialization error")
            .with_context(format!("Error: {}", msg)),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(footprint_error) = error.downcast_ref::<FootprintError>() {
        let cli_error = from_footprint(footprint_error);
        // Keep any context added on the way up
        return match error.chain().next() {
            Some(outer) if outer.to_string() != footprint_error.to_string() => {
                let context = cli_error.context.clone().unwrap_or_default();
                cli_error.with_context(format!("{}\n{}", outer, context).trim_end().to_string())
            }
            _ => cli_error,
        };
    }

    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
