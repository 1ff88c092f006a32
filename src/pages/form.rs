use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One labelled text input.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    pub masked: bool,
    pub disabled: bool,
    pub placeholder: &'static str,
    pub hint: Option<&'static str>,
    /// Heading drawn above this field when it opens a new section.
    pub section: Option<&'static str>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            value: String::new(),
            required: false,
            masked: false,
            disabled: false,
            placeholder: "",
            hint: None,
            section: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = text;
        self
    }

    pub fn hint(mut self, text: &'static str) -> Self {
        self.hint = Some(text);
        self
    }

    pub fn section(mut self, title: &'static str) -> Self {
        self.section = Some(title);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Trimmed value, `None` when blank.
    pub fn non_empty(&self) -> Option<String> {
        let v = self.value.trim();
        (!v.is_empty()).then(|| v.to_string())
    }
}

/// What a key press meant to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Submit,
    Cancel,
    Edited,
    Moved,
    Ignored,
}

/// An ordered set of fields with a single focused one.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.field(name).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.field(name).and_then(FormField::non_empty)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(name) {
            field.value = value.into();
        }
    }

    pub fn set_disabled(&mut self, name: &str, disabled: bool) {
        if let Some(field) = self.field_mut(name) {
            field.disabled = disabled;
        }
    }

    pub fn set_hint(&mut self, name: &str, hint: Option<&'static str>) {
        if let Some(field) = self.field_mut(name) {
            field.hint = hint;
        }
    }

    #[cfg(test)]
    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        let len = self.fields.len();
        for step in 1..=len {
            let idx = (self.focus + step) % len;
            if !self.fields[idx].disabled {
                self.focus = idx;
                return;
            }
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields.len();
        for step in 1..=len {
            let idx = (self.focus + len - step) % len;
            if !self.fields[idx].disabled {
                self.focus = idx;
                return;
            }
        }
    }

    /// First required field left blank, by label.
    pub fn missing_required(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.required && f.value.trim().is_empty())
            .map(|f| f.label)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Enter => FormInput::Submit,
            KeyCode::Esc => FormInput::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormInput::Moved
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormInput::Moved
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit(String::clear)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit(|v| v.push(c))
            }
            KeyCode::Backspace => self.edit(|v| {
                v.pop();
            }),
            _ => FormInput::Ignored,
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) -> FormInput {
        match self.fields.get_mut(self.focus) {
            Some(field) if !field.disabled => {
                f(&mut field.value);
                FormInput::Edited
            }
            _ => FormInput::Ignored,
        }
    }
}

#[cfg(test)]
pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
pub(crate) fn type_text(form: &mut Form, text: &str) {
    for c in text.chars() {
        form.handle_key(key(KeyCode::Char(c)));
    }
}
