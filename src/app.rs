//! Application state and key handling for the sign-up demo

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use reactive_forms::{FieldSpec, Form, FormConfig, FormEvent, Rule, Verdict};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Usernames the availability check rejects
const TAKEN_USERNAMES: &[&str] = &["admin", "root", "centy"];

/// Simulated round trip of the availability check
const AVAILABILITY_DELAY: Duration = Duration::from_millis(300);

/// Field specs of the sign-up form
pub fn signup_specs() -> Result<Vec<FieldSpec<String>>> {
    Ok(vec![
        FieldSpec::new("username")
            .label("Username")
            .required_message("Pick a username")
            .rule(Rule::pattern_str("^[a-z0-9_]{3,16}$")?)
            .rule(Rule::check_async(|username: String| async move {
                tokio::time::sleep(AVAILABILITY_DELAY).await;
                if TAKEN_USERNAMES.contains(&username.as_str()) {
                    Verdict::fail("Username is taken")
                } else {
                    Verdict::pass()
                }
            })),
        FieldSpec::new("email")
            .label("Email")
            .required()
            .rule(Rule::pattern_str(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?),
        FieldSpec::new("bio").label("Bio").rule(Rule::check(|bio: &String| {
            (bio.chars().count() <= 140, "Keep it under 140 characters")
        })),
    ])
}

/// Main application struct
pub struct App {
    /// The form being edited
    pub form: Form<String>,
    /// Index of the focused field
    pub active_field: usize,
    /// Result of the last explicit action
    pub status_message: Option<String>,
    /// Last change reported by the form observer
    pub last_event: Arc<Mutex<Option<String>>>,
    /// Set by the observer when the form changed since the last draw
    dirty: Arc<AtomicBool>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance. Must run inside a tokio runtime.
    pub fn new(config: FormConfig) -> Result<Self> {
        let form = Form::from_specs_with_config(signup_specs()?, config)?;

        let last_event = Arc::new(Mutex::new(None));
        let dirty = Arc::new(AtomicBool::new(true));
        {
            let last_event = Arc::clone(&last_event);
            let dirty = Arc::clone(&dirty);
            form.subscribe(Arc::new(move |event: &FormEvent| {
                if let Ok(mut slot) = last_event.lock() {
                    *slot = Some(describe(event));
                }
                dirty.store(true, Ordering::Release);
            }));
        }

        Ok(Self {
            form,
            active_field: 0,
            status_message: None,
            last_event,
            dirty,
            quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Returns true once after each form change
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Key of the focused field
    pub fn active_key(&self) -> Option<String> {
        self.form.keys().into_iter().nth(self.active_field)
    }

    pub fn next_field(&mut self) {
        let count = self.form.len().max(1);
        self.active_field = (self.active_field + 1) % count;
    }

    pub fn prev_field(&mut self) {
        let count = self.form.len().max(1);
        if self.active_field == 0 {
            self.active_field = count - 1;
        } else {
            self.active_field -= 1;
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Char('r') if ctrl => {
                self.form.reset();
                self.status_message = Some("Form reset".to_string());
            }
            KeyCode::Char('l') if ctrl => {
                // Revalidation lands through the observer
                self.form.clear();
                self.status_message = Some("Form cleared".to_string());
            }
            KeyCode::Char('u') if ctrl => {
                self.form.untouch_all();
                self.status_message = Some("All fields untouched".to_string());
            }
            KeyCode::Enter => self.submit().await,
            KeyCode::Char(c) if !ctrl => self.edit_active(|value| value.push(c)),
            KeyCode::Backspace => self.edit_active(|value| {
                value.pop();
            }),
            _ => {}
        }
        Ok(())
    }

    fn edit_active(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(key) = self.active_key() else {
            return;
        };
        let mut value = self.form.value(&key).unwrap_or_default();
        edit(&mut value);
        self.form.update([(key.as_str(), value)], false);
    }

    /// Validate everything and report the outcome
    async fn submit(&mut self) {
        self.form.validate().await;
        let invalid = self
            .form
            .errors()
            .values()
            .filter(|error| error.is_some())
            .count();

        self.status_message = Some(if invalid == 0 {
            tracing::info!("Sign-up form submitted");
            "Form is valid".to_string()
        } else {
            format!("{invalid} field(s) need attention")
        });
    }
}

/// Short description of a form event for the status bar
fn describe(event: &FormEvent) -> String {
    match event {
        FormEvent::Registered { key } => format!("registered {key}"),
        FormEvent::Updated { keys } => format!("updated {}", keys.join(", ")),
        FormEvent::Untouched { keys } => format!("untouched {}", keys.join(", ")),
        FormEvent::Reset => "reset".to_string(),
        FormEvent::Cleared => "cleared".to_string(),
        FormEvent::Validated { key, error: None } => format!("{key} ok"),
        FormEvent::Validated {
            key,
            error: Some(error),
        } => format!("{key}: {error}"),
    }
}
