// ── Dialog configuration ──
//
// One options record per call site. Every field toggles a region of the
// shared dialog; anything left at its default stays hidden.

/// Default label of the numeric field.
pub const DEFAULT_TIMING_LABEL: &str = "timing:";
/// Default caption of the pair button.
pub const DEFAULT_PAIR_BUTTON: &str = "Pair";
/// Default caption of the unpair button.
pub const DEFAULT_UNPAIR_BUTTON: &str = "Unpair";
/// Default warning shown in delete-confirm.
pub const DEFAULT_DELETE_INFO: &str = "⚠️ Unpair devices first before deleting.";

/// What the dialog shows for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: String,
    /// Caption of the free-text field.
    pub label: String,
    /// Informational lines.
    pub items: Vec<String>,
    /// Secondary informational lines (shown beside `items`).
    pub content: Vec<String>,

    pub show_input: bool,
    pub default_value: String,

    pub show_timing: bool,
    pub timing_label: Option<String>,
    pub default_timing: String,
    /// The second field holds a duration and takes digits only.
    pub numeric_timing: bool,

    pub show_boolean: bool,
    pub boolean_label: String,
    pub default_boolean: bool,

    /// Device picker populated from the registry when the dialog opens.
    pub show_device_picker: bool,

    pub show_save: bool,
    /// Enables the delete entry button (requires an `on_delete` callback).
    pub show_delete: bool,
    /// Shows a plain Cancel button in normal mode.
    pub show_cancel: bool,

    /// Caption above the pair/unpair buttons; shown only when one exists.
    pub pair_label: Option<String>,
    pub pair_button: Option<String>,
    pub unpair_button: Option<String>,
    pub delete_info: Option<String>,
}

impl DialogOptions {
    pub fn new(title: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn content<I, S>(mut self, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content = content.into_iter().map(Into::into).collect();
        self
    }

    pub fn input(mut self, default_value: impl Into<String>) -> Self {
        self.show_input = true;
        self.default_value = default_value.into();
        self
    }

    pub fn timing(mut self, default_timing: impl Into<String>) -> Self {
        self.show_timing = true;
        self.default_timing = default_timing.into();
        self
    }

    pub fn numeric_timing(mut self) -> Self {
        self.numeric_timing = true;
        self
    }

    pub fn timing_label(mut self, label: impl Into<String>) -> Self {
        self.timing_label = Some(label.into());
        self
    }

    pub fn boolean(mut self, label: impl Into<String>, default: bool) -> Self {
        self.show_boolean = true;
        self.boolean_label = label.into();
        self.default_boolean = default;
        self
    }

    pub fn device_picker(mut self) -> Self {
        self.show_device_picker = true;
        self
    }

    pub fn save(mut self) -> Self {
        self.show_save = true;
        self
    }

    pub fn delete(mut self, info: Option<&str>) -> Self {
        self.show_delete = true;
        self.delete_info = info.map(str::to_owned);
        self
    }

    pub fn cancel(mut self) -> Self {
        self.show_cancel = true;
        self
    }

    pub fn pairing(
        mut self,
        label: impl Into<String>,
        pair_button: Option<&str>,
        unpair_button: Option<&str>,
    ) -> Self {
        self.pair_label = Some(label.into());
        self.pair_button = pair_button.map(str::to_owned);
        self.unpair_button = unpair_button.map(str::to_owned);
        self
    }

    // ── Resolved captions ────────────────────────────────────────────

    pub fn timing_caption(&self) -> &str {
        self.timing_label.as_deref().unwrap_or(DEFAULT_TIMING_LABEL)
    }

    pub fn pair_caption(&self) -> &str {
        self.pair_button.as_deref().unwrap_or(DEFAULT_PAIR_BUTTON)
    }

    pub fn unpair_caption(&self) -> &str {
        self.unpair_button.as_deref().unwrap_or(DEFAULT_UNPAIR_BUTTON)
    }

    pub fn delete_warning(&self) -> &str {
        self.delete_info.as_deref().unwrap_or(DEFAULT_DELETE_INFO)
    }
}
