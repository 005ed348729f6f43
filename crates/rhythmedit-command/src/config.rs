/// Settings for an [`ActionManager`](crate::ActionManager).
///
/// ```
/// # use rhythmedit_command::HistoryConfig;
/// let config = HistoryConfig::new().set_max_undo(Some(200)).set_validate(false);
/// assert_eq!(config.max_undo(), Some(200));
/// ```
#[derive(Clone, Debug)]
pub struct HistoryConfig {
    max_undo: Option<usize>,
    validate: bool,
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many actions the undo history holds before it starts forgetting the oldest ones.
    /// `None` (the default) keeps everything.
    pub fn max_undo(&self) -> Option<usize> {
        self.max_undo
    }
    pub fn set_max_undo(mut self, max_undo: Option<usize>) -> Self {
        self.max_undo = max_undo;
        self
    }

    /// Whether to run [`WorkingMap::validate`](rhythmedit_lib::WorkingMap::validate) after every
    /// perform, undo and redo. On by default in debug builds.
    pub fn validate(&self) -> bool {
        self.validate
    }
    pub fn set_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_undo: None,
            validate: cfg!(debug_assertions),
        }
    }
}
