//! Text-entry form state shared by the auth and data pages.

use trenditor_core::models::forms::MAX_TOOT_LENGTH;
use trenditor_core::models::{
    LoginForm, PasswordResetForm, SearchForm, SignUpForm, TootDraft, TrendsForm, Visibility,
};

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for short free-text fields (name, keyword, host)
const MAX_SHORT_TEXT_LENGTH: usize = 100;

/// Maximum digits accepted by numeric fields
const MAX_NUMBER_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Number,
    /// Toggled with space or arrows instead of typed
    Visibility,
}

#[derive(Debug, Clone)]
pub struct InputField {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub max_len: usize,
}

impl InputField {
    fn text(label: &'static str, max_len: usize) -> Self {
        Self {
            label,
            value: String::new(),
            kind: FieldKind::Text,
            max_len,
        }
    }

    fn password(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            kind: FieldKind::Password,
            max_len: MAX_PASSWORD_LENGTH,
        }
    }

    fn number(label: &'static str, initial: u32) -> Self {
        Self {
            label,
            value: initial.to_string(),
            kind: FieldKind::Number,
            max_len: MAX_NUMBER_DIGITS,
        }
    }

    fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Value as shown on screen (passwords masked)
    pub fn display(&self) -> String {
        match self.kind {
            FieldKind::Password => "*".repeat(self.value.chars().count()),
            _ => self.value.clone(),
        }
    }

    pub fn push(&mut self, c: char) -> bool {
        if !can_add_char(self.kind, self.value.chars().count(), self.max_len, c) {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    fn as_number(&self) -> u32 {
        self.value.parse().unwrap_or(0)
    }
}

/// Check if a character should be accepted by a field
pub fn can_add_char(kind: FieldKind, current_len: usize, max_len: usize, c: char) -> bool {
    if current_len >= max_len || c.is_control() {
        return false;
    }
    match kind {
        FieldKind::Number => c.is_ascii_digit(),
        FieldKind::Visibility => false,
        FieldKind::Text | FieldKind::Password => true,
    }
}

/// A list of fields followed by a submit button.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<InputField>,
    /// Index into `fields`; `fields.len()` means the submit button
    pub focus: usize,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub submitting: bool,
    pub visibility: Visibility,
}

impl Form {
    fn new(fields: Vec<InputField>, submit_label: &'static str) -> Self {
        Self {
            fields,
            focus: 0,
            submit_label,
            error: None,
            submitting: false,
            visibility: Visibility::default(),
        }
    }

    pub fn sign_in(last_email: Option<&str>) -> Self {
        let email = InputField::text("Email", MAX_EMAIL_LENGTH).with_value(last_email.unwrap_or(""));
        let mut form = Self::new(vec![email, InputField::password("Password")], "Sign In");
        if last_email.is_some_and(|e| !e.is_empty()) {
            form.focus = 1;
        }
        form
    }

    pub fn sign_up() -> Self {
        Self::new(
            vec![
                InputField::text("Name", MAX_SHORT_TEXT_LENGTH),
                InputField::text("Email", MAX_EMAIL_LENGTH),
                InputField::password("Password"),
            ],
            "Create Account",
        )
    }

    pub fn forgot_password() -> Self {
        Self::new(
            vec![
                InputField::text("Email", MAX_EMAIL_LENGTH),
                InputField::password("New password"),
            ],
            "Submit",
        )
    }

    pub fn search() -> Self {
        let defaults = SearchForm::default();
        Self::new(
            vec![
                InputField::text("Keyword", MAX_SHORT_TEXT_LENGTH),
                InputField::text("Instance", MAX_SHORT_TEXT_LENGTH).with_value(&defaults.instance),
                InputField::number("Posts", defaults.limit),
            ],
            "Search",
        )
    }

    pub fn trends() -> Self {
        let defaults = TrendsForm::default();
        Self::new(
            vec![
                InputField::number("Number of trends", defaults.num_trends),
                InputField::number("Posts per trend", defaults.num_posts),
            ],
            "Analyze Trends",
        )
    }

    pub fn post_toot() -> Self {
        Self::new(
            vec![
                InputField::text("Content", MAX_TOOT_LENGTH),
                InputField {
                    label: "Visibility",
                    value: String::new(),
                    kind: FieldKind::Visibility,
                    max_len: 0,
                },
            ],
            "Post Toot",
        )
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    fn number(&self, index: usize) -> u32 {
        self.fields.get(index).map(InputField::as_number).unwrap_or(0)
    }

    pub fn on_submit(&self) -> bool {
        self.focus == self.fields.len()
    }

    pub fn focused_field(&mut self) -> Option<&mut InputField> {
        self.fields.get_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len()) % (self.fields.len() + 1);
    }

    /// Type a character into the focused field. Visibility fields cycle on space.
    pub fn input_char(&mut self, c: char) {
        let visibility = self.visibility;
        let mut cycled = None;
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.kind == FieldKind::Visibility {
                if c == ' ' {
                    cycled = Some(visibility.next());
                }
            } else {
                field.push(c);
            }
        }
        if let Some(v) = cycled {
            self.visibility = v;
        }
    }

    pub fn cycle_visibility(&mut self) {
        if self
            .fields
            .get(self.focus)
            .is_some_and(|f| f.kind == FieldKind::Visibility)
        {
            self.visibility = self.visibility.next();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_field() {
            field.pop();
        }
    }

    /// Clear password fields, keep everything else
    pub fn clear_secrets(&mut self) {
        for field in &mut self.fields {
            if field.kind == FieldKind::Password {
                field.value.clear();
            }
        }
    }

    pub fn reset_values(&mut self) {
        for field in &mut self.fields {
            if field.kind != FieldKind::Number {
                field.value.clear();
            }
        }
        self.focus = 0;
    }

    // ===== Payloads =====

    pub fn login_payload(&self) -> LoginForm {
        LoginForm {
            email: self.value(0).trim().to_string(),
            password: self.value(1).to_string(),
        }
    }

    pub fn sign_up_payload(&self) -> SignUpForm {
        SignUpForm {
            name: self.value(0).trim().to_string(),
            email: self.value(1).trim().to_string(),
            password: self.value(2).to_string(),
        }
    }

    pub fn reset_payload(&self) -> PasswordResetForm {
        PasswordResetForm {
            email: self.value(0).trim().to_string(),
            password: self.value(1).to_string(),
        }
    }

    pub fn search_payload(&self) -> SearchForm {
        SearchForm {
            keyword: self.value(0).trim().to_string(),
            instance: self.value(1).trim().to_string(),
            limit: self.number(2),
        }
    }

    pub fn trends_payload(&self) -> TrendsForm {
        TrendsForm {
            num_trends: self.number(0),
            num_posts: self.number(1),
        }
    }

    pub fn toot_payload(&self) -> TootDraft {
        TootDraft::new(self.value(0), self.visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(FieldKind::Text, 0, 10, 'a'));
        assert!(!can_add_char(FieldKind::Text, 10, 10, 'a'));
        assert!(!can_add_char(FieldKind::Text, 0, 10, '\n'));
        assert!(!can_add_char(FieldKind::Password, 0, 10, '\x00'));
        assert!(can_add_char(FieldKind::Number, 0, 3, '7'));
        assert!(!can_add_char(FieldKind::Number, 0, 3, 'x'));
        assert!(!can_add_char(FieldKind::Visibility, 0, 3, 'x'));
    }

    #[test]
    fn test_focus_wraps_through_submit() {
        let mut form = Form::sign_up();
        assert_eq!(form.focus, 0);
        form.focus_prev();
        assert!(form.on_submit());
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_sign_in_prefills_email() {
        let form = Form::sign_in(Some("a@x.com"));
        assert_eq!(form.value(0), "a@x.com");
        assert_eq!(form.focus, 1);
        assert_eq!(Form::sign_in(None).focus, 0);
    }

    #[test]
    fn test_password_masked_and_cleared() {
        let mut form = Form::sign_in(Some("a@x.com"));
        for c in "secret".chars() {
            form.input_char(c);
        }
        assert_eq!(form.fields[1].display(), "******");
        assert_eq!(form.login_payload().password, "secret");
        form.clear_secrets();
        assert_eq!(form.value(1), "");
        assert_eq!(form.value(0), "a@x.com");
    }

    #[test]
    fn test_number_fields_payload() {
        let mut form = Form::trends();
        form.backspace();
        form.input_char('4');
        form.input_char('x');
        assert_eq!(form.trends_payload().num_trends, 4);
        assert_eq!(form.trends_payload().num_posts, 1);
    }

    #[test]
    fn test_visibility_cycles_on_space_only() {
        let mut form = Form::post_toot();
        form.focus = 1;
        form.input_char('a');
        assert_eq!(form.visibility, Visibility::Public);
        form.input_char(' ');
        assert_eq!(form.visibility, Visibility::Unlisted);
        form.cycle_visibility();
        assert_eq!(form.toot_payload().visibility, Visibility::Private);
    }

    #[test]
    fn test_toot_content_capped() {
        let mut form = Form::post_toot();
        for _ in 0..(MAX_TOOT_LENGTH + 10) {
            form.input_char('a');
        }
        assert_eq!(form.value(0).len(), MAX_TOOT_LENGTH);
    }
}
