//! Language modes and new-file extensions.

/// Extensions offered for new documents.
pub const NEW_FILE_EXTENSIONS: [&str; 4] = [".txt", ".kt", ".java", ".py"];

/// How the base styling layer is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageMode {
    /// The hand-written Kotlin tokenizer
    #[default]
    BuiltIn,
    /// The regex highlighter driven by a syntax resource
    Configured {
        name: String,
        resource: String,
        extension: String,
    },
}

impl LanguageMode {
    pub fn python() -> Self {
        Self::configured("Python", "python.json", ".py")
    }

    pub fn java() -> Self {
        Self::configured("Java", "java.json", ".java")
    }

    fn configured(name: &str, resource: &str, extension: &str) -> Self {
        Self::Configured {
            name: name.to_string(),
            resource: resource.to_string(),
            extension: extension.to_string(),
        }
    }

    /// The modes offered in the language selector.
    pub fn presets() -> [Self; 3] {
        [Self::BuiltIn, Self::python(), Self::java()]
    }

    /// Looks up a preset by name (`kotlin`, `python`, `java`), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::presets()
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn => "Kotlin",
            Self::Configured { name, .. } => name,
        }
    }

    /// Selector label, e.g. `Kotlin (built-in)` or `Python (config)`.
    pub fn label(&self) -> String {
        match self {
            Self::BuiltIn => format!("{} (built-in)", self.name()),
            Self::Configured { name, .. } => format!("{name} (config)"),
        }
    }

    /// Extension new documents get in this mode.
    pub fn extension(&self) -> &str {
        match self {
            Self::BuiltIn => ".kt",
            Self::Configured { extension, .. } => extension,
        }
    }

    /// Syntax resource to load, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::BuiltIn => None,
            Self::Configured { resource, .. } => Some(resource),
        }
    }
}

/// Returns true if `ext` is one of [`NEW_FILE_EXTENSIONS`].
pub fn is_new_file_extension(ext: &str) -> bool {
    NEW_FILE_EXTENSIONS.contains(&ext)
}
