#![forbid(unsafe_code)]

//! Create-if-absent picker registry.
//!
//! Elements are matched by id; each id gets exactly one [`DatePicker`], no
//! matter how many times [`PickerRegistry::ensure`] or
//! [`PickerRegistry::scan`] sees it. The picker's configuration comes from
//! the registry's base config with every preset class the element carries
//! applied in table order, so a later row overrides an earlier one:
//!
//! | class           | effect                                           |
//! |-----------------|--------------------------------------------------|
//! | `pick-date`     | format `%d/%m/%Y`                                |
//! | `pick-datetime` | format `%d/%m/%Y @ %H:%M`, time picker, step 5   |
//! | `pick-time`     | format `%H:%M`, pick only the time, step 5       |
//! | `clearable`     | keystrokes reach the input                       |

use ahash::AHashMap;
use hyde_core::ViewKind;

use crate::date_picker::attach::{DatePicker, TextInput};
use crate::date_picker::config::PickerConfig;

/// Picker flavour selected by an element's classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerPreset {
    Date,
    DateTime,
    Time,
}

impl PickerPreset {
    /// CSS class selecting this preset.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Date => "pick-date",
            Self::DateTime => "pick-datetime",
            Self::Time => "pick-time",
        }
    }

    pub const ALL: [Self; 3] = [Self::Date, Self::DateTime, Self::Time];

    /// Presets named by `classes`, in application order.
    #[must_use]
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|preset| classes.iter().any(|class| class.as_ref() == preset.class()))
            .collect()
    }

    /// Apply the preset on top of `config`.
    #[must_use]
    pub fn apply(self, mut config: PickerConfig) -> PickerConfig {
        match self {
            Self::Date => {
                config.format = Some("%d/%m/%Y".into());
            }
            Self::DateTime => {
                config.format = Some("%d/%m/%Y @ %H:%M".into());
                config.time_picker = true;
                config.time_wheel_step = 5;
            }
            Self::Time => {
                config.format = Some("%H:%M".into());
                config.pick_only = Some(ViewKind::Time);
                config.time_wheel_step = 5;
            }
        }
        config
    }
}

/// An element offered to [`PickerRegistry::scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerElement {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub value: String,
}

impl PickerElement {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Pickers keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct PickerRegistry {
    pickers: AHashMap<String, DatePicker<TextInput>>,
    base: PickerConfig,
    next_id: u64,
}

impl PickerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose pickers start from `base`.
    #[must_use]
    pub fn with_base(base: PickerConfig) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Config for an element with `classes`.
    #[must_use]
    pub fn config_for<S: AsRef<str>>(&self, classes: &[S]) -> PickerConfig {
        let mut config = PickerPreset::from_classes(classes)
            .into_iter()
            .fold(self.base.clone(), |config, preset| preset.apply(config));
        if classes.iter().any(|class| class.as_ref() == "clearable") {
            config.block_keydown = false;
        }
        config
    }

    /// Picker for `id`, created from `classes` on first sight.
    pub fn ensure<S: AsRef<str>>(&mut self, id: &str, classes: &[S]) -> &mut DatePicker<TextInput> {
        self.ensure_with_value(id, classes, "")
    }

    fn ensure_with_value<S: AsRef<str>>(
        &mut self,
        id: &str,
        classes: &[S],
        value: &str,
    ) -> &mut DatePicker<TextInput> {
        if !self.pickers.contains_key(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "datepicker.registered",
                id,
                presets = ?PickerPreset::from_classes(classes)
            );
        }
        let config = self.config_for(classes);
        self.pickers.entry(id.to_string()).or_insert_with(|| {
            let mut picker = DatePicker::new(config);
            picker.attach(TextInput::new(id).with_value(value));
            picker
        })
    }

    /// Ensure a picker for every element carrying a preset class. Elements
    /// without an id get a generated one. Returns how many pickers were
    /// created.
    pub fn scan(&mut self, elements: &mut [PickerElement]) -> usize {
        let mut created = 0;
        for element in elements.iter_mut() {
            if PickerPreset::from_classes(&element.classes).is_empty() {
                continue;
            }
            let id = match &element.id {
                Some(id) => id.clone(),
                None => {
                    let id = self.unique_id();
                    element.id = Some(id.clone());
                    id
                }
            };
            if self.pickers.contains_key(&id) {
                continue;
            }
            self.ensure_with_value(&id, &element.classes, &element.value);
            created += 1;
        }
        created
    }

    /// Fresh id not used by any registered picker.
    pub fn unique_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("hyde-picker-{}", self.next_id);
            if !self.pickers.contains_key(&id) {
                return id;
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DatePicker<TextInput>> {
        self.pickers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DatePicker<TextInput>> {
        self.pickers.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.pickers.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pickers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pickers.is_empty()
    }

    pub fn remove(&mut self, id: &str) -> Option<DatePicker<TextInput>> {
        self.pickers.remove(id)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.pickers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
