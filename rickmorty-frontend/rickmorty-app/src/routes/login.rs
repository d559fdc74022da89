use std::sync::Arc;

use log::info;

use super::Route;
use crate::{
    auth::{
        error_handler::login_error_message,
        guards::{no_auth_guard, GuardOutcome},
        AuthBackend,
    },
    error::{AppError, AppResult},
    form_utils::{email_validator, min_length_validator, required, FormControl},
    global_state::SessionState,
};

#[derive(Debug)]
pub struct LoginForm {
    pub mail: FormControl,
    pub password: FormControl,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mail: FormControl::default().with(required).with(email_validator),
            password: FormControl::default()
                .with(required)
                .with(min_length_validator(6)),
        }
    }
}

impl LoginForm {
    pub fn is_valid(&self) -> bool {
        self.mail.is_valid() && self.password.is_valid()
    }

    pub fn mark_all_as_touched(&mut self) {
        self.mail.mark_as_touched();
        self.password.mark_as_touched();
    }
}

pub struct LoginPage {
    backend: Arc<dyn AuthBackend>,
    session: SessionState,
    pub form: LoginForm,
    is_loading: bool,
    login_error: Option<String>,
}

impl LoginPage {
    /// Fails with [`AppError::Redirected`] when someone is already signed in.
    pub fn open(backend: Arc<dyn AuthBackend>, session: SessionState) -> AppResult<Self> {
        if let GuardOutcome::Redirect(route) = no_auth_guard(&session) {
            return Err(AppError::Redirected(route));
        }
        Ok(Self {
            backend,
            session,
            form: LoginForm::default(),
            is_loading: false,
            login_error: None,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    /// Signs in with the form's values and returns where to go next.
    pub async fn submit(&mut self) -> AppResult<Route> {
        if !self.form.is_valid() {
            self.form.mark_all_as_touched();
            return Err(AppError::InvalidForm);
        }
        self.is_loading = true;
        self.login_error = None;
        let result = self
            .backend
            .login(&self.form.mail.value, &self.form.password.value)
            .await;
        self.is_loading = false;
        match result {
            Ok(response) => {
                self.session.save_auth_data(&response.token, &response.user)?;
                info!("{} signed in", response.user.mail);
                Ok(Route::Characters)
            }
            Err(e) => {
                self.login_error = Some(login_error_message(&e));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::MockAuthService, form_utils::ValidationError};
    use std::time::Duration;

    fn backend() -> Arc<dyn AuthBackend> {
        Arc::new(MockAuthService::new().with_latency(Duration::ZERO))
    }

    #[test]
    fn form_validation() {
        let mut form = LoginForm::default();
        assert!(!form.is_valid());
        assert!(form.mail.errors().contains(&ValidationError::Required));

        form.mail.set_value("demo@demo");
        assert!(form.mail.errors().contains(&ValidationError::InvalidEmailFormat));
        form.mail.set_value("demo@demo.com");
        form.password.set_value("demo");
        assert_eq!(
            form.password.error_text().as_deref(),
            Some("La contraseña debe tener al menos 6 caracteres")
        );
        form.password.set_value("demo123");
        assert!(form.is_valid());
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() {
        let mut page = LoginPage::open(backend(), SessionState::default()).unwrap();
        assert!(matches!(page.submit().await, Err(AppError::InvalidForm)));
        assert!(page.form.mail.shows_error());
        assert!(page.form.password.shows_error());
    }

    #[tokio::test]
    async fn successful_login_saves_session() {
        let session = SessionState::default();
        let mut page = LoginPage::open(backend(), session.clone()).unwrap();
        page.form.mail.set_value("demo@demo.com");
        page.form.password.set_value("demo123");

        assert_eq!(page.submit().await.unwrap(), Route::Characters);
        assert!(!page.is_loading());
        assert!(session.is_logged_in());
        assert_eq!(session.current_user().unwrap().name, "Demo User");

        assert!(matches!(
            LoginPage::open(backend(), session),
            Err(AppError::Redirected(Route::Characters))
        ));
    }

    #[tokio::test]
    async fn wrong_password_sets_error() {
        let session = SessionState::default();
        let mut page = LoginPage::open(backend(), session.clone()).unwrap();
        page.form.mail.set_value("demo@demo.com");
        page.form.password.set_value("wrong-password");

        assert!(matches!(page.submit().await, Err(AppError::Auth(_))));
        assert_eq!(
            page.login_error(),
            Some("Credenciales incorrectas. Verifica tu email y contraseña.")
        );
        assert!(!session.is_logged_in());
    }
}
