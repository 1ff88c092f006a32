use super::form::{Form, FormField};
use crate::api::{ApiError, AuthResponse, Credentials, Registration};

/// Login form state.
#[derive(Debug, Clone)]
pub struct LoginPage {
    pub form: Form,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                FormField::new("username", "Username").required(),
                FormField::new("password", "Password").required().masked(),
            ]),
            loading: false,
            error: None,
        }
    }

    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        if let Some(label) = self.form.missing_required() {
            self.error = Some(format!("{label} is required"));
            return None;
        }
        self.error = None;
        self.loading = true;
        Some(Credentials {
            username: self.form.value("username").trim().to_string(),
            password: self.form.value("password").to_string(),
        })
    }

    /// Returns the session to commit on success.
    pub fn apply(&mut self, result: Result<AuthResponse, ApiError>) -> Option<AuthResponse> {
        self.loading = false;
        match result {
            Ok(auth) => Some(auth),
            Err(e) => {
                tracing::info!(status = ?e.status(), "login rejected");
                self.error = Some(
                    e.field_message("error")
                        .or_else(|| e.field_message("detail"))
                        .unwrap_or_else(|| "Login failed".to_string()),
                );
                self.form.set_value("password", "");
                None
            }
        }
    }
}

/// Registration form state.
#[derive(Debug, Clone)]
pub struct RegisterPage {
    pub form: Form,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterPage {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                FormField::new("username", "Username").required(),
                FormField::new("email", "Email").required(),
                FormField::new("password", "Password").required().masked(),
                FormField::new("password2", "Confirm Password").required().masked(),
            ]),
            loading: false,
            error: None,
        }
    }

    pub fn begin_submit(&mut self) -> Option<Registration> {
        if self.loading {
            return None;
        }
        if let Some(label) = self.form.missing_required() {
            self.error = Some(format!("{label} is required"));
            return None;
        }
        self.error = None;
        self.loading = true;
        Some(Registration {
            username: self.form.value("username").trim().to_string(),
            email: self.form.value("email").trim().to_string(),
            password: self.form.value("password").to_string(),
            password2: self.form.value("password2").to_string(),
        })
    }

    pub fn apply(&mut self, result: Result<AuthResponse, ApiError>) -> Option<AuthResponse> {
        self.loading = false;
        match result {
            Ok(auth) => Some(auth),
            Err(e) => {
                tracing::info!(status = ?e.status(), "registration rejected");
                self.error = Some(
                    e.validation_summary()
                        .unwrap_or_else(|| "Registration failed".to_string()),
                );
                None
            }
        }
    }
}
