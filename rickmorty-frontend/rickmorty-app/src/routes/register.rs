use std::sync::Arc;

use log::info;
use rickmorty_api_types::{Address, RegisterAck, RegisterData};

use super::Route;
use crate::{
    auth::{
        error_handler::register_error_message,
        guards::{no_auth_guard, GuardOutcome},
        AuthBackend,
    },
    error::{AppError, AppResult},
    form_utils::{
        address_group_validator, fields_equal, full_name_validator, get_text_error,
        mail_validator, name_validator, password_validator_with_length, required, FormControl,
        ValidationErrors,
    },
    global_state::SessionState,
};

#[derive(Debug)]
pub struct RegisterForm {
    pub name: FormControl,
    pub mail: FormControl,
    pub password: FormControl,
    pub password2: FormControl,
    pub street: FormControl,
    pub city: FormControl,
    pub region: FormControl,
    pub postal_code: FormControl,
    pub phone: FormControl,
    pub birthday: FormControl,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: FormControl::default()
                .with(required)
                .with(name_validator)
                .with(full_name_validator),
            mail: FormControl::default().with(required).with(mail_validator),
            password: FormControl::default()
                .with(required)
                .with(password_validator_with_length),
            password2: FormControl::default().with(required),
            street: FormControl::default(),
            city: FormControl::default(),
            region: FormControl::default(),
            postal_code: FormControl::default(),
            phone: FormControl::default(),
            birthday: FormControl::default(),
        }
    }
}

fn optional(control: &FormControl) -> Option<String> {
    let value = control.value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl RegisterForm {
    fn controls(&self) -> [&FormControl; 10] {
        [
            &self.name,
            &self.mail,
            &self.password,
            &self.password2,
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.phone,
            &self.birthday,
        ]
    }

    pub fn address(&self) -> Address {
        Address {
            street: self.street.value.trim().to_string(),
            city: self.city.value.trim().to_string(),
            region: self.region.value.trim().to_string(),
            postal_code: self.postal_code.value.trim().to_string(),
        }
    }

    /// Checks that span several fields.
    pub fn group_errors(&self) -> ValidationErrors {
        [
            fields_equal(&self.password.value, &self.password2.value),
            address_group_validator(&self.address()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn group_error_text(&self) -> Option<String> {
        get_text_error(&self.group_errors())
    }

    pub fn is_valid(&self) -> bool {
        self.controls().iter().all(|c| c.is_valid()) && self.group_errors().is_empty()
    }

    pub fn mark_all_as_touched(&mut self) {
        for control in [
            &mut self.name,
            &mut self.mail,
            &mut self.password,
            &mut self.password2,
            &mut self.street,
            &mut self.city,
            &mut self.region,
            &mut self.postal_code,
            &mut self.phone,
            &mut self.birthday,
        ] {
            control.mark_as_touched();
        }
    }

    pub fn to_register_data(&self) -> RegisterData {
        let address = self.address();
        RegisterData {
            name: self.name.value.trim().to_string(),
            mail: self.mail.value.trim().to_string(),
            password: self.password.value.clone(),
            address: (!address.is_empty()).then_some(address),
            phone: optional(&self.phone),
            birthday: optional(&self.birthday),
        }
    }
}

pub struct RegisterPage {
    backend: Arc<dyn AuthBackend>,
    pub form: RegisterForm,
    is_loading: bool,
    register_error: Option<String>,
    registered: Option<RegisterAck>,
}

impl RegisterPage {
    /// Fails with [`AppError::Redirected`] when someone is already signed in.
    pub fn open(backend: Arc<dyn AuthBackend>, session: &SessionState) -> AppResult<Self> {
        if let GuardOutcome::Redirect(route) = no_auth_guard(session) {
            return Err(AppError::Redirected(route));
        }
        Ok(Self {
            backend,
            form: RegisterForm::default(),
            is_loading: false,
            register_error: None,
            registered: None,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn register_error(&self) -> Option<&str> {
        self.register_error.as_deref()
    }

    pub fn registered(&self) -> Option<&RegisterAck> {
        self.registered.as_ref()
    }

    /// Registers the form's values. On success the caller moves on to login.
    pub async fn submit(&mut self) -> AppResult<Route> {
        if !self.form.is_valid() {
            self.form.mark_all_as_touched();
            return Err(AppError::InvalidForm);
        }
        self.is_loading = true;
        self.register_error = None;
        self.registered = None;
        let result = self.backend.register(self.form.to_register_data()).await;
        self.is_loading = false;
        match result {
            Ok(ack) => {
                info!("registered {}", ack.mail);
                self.registered = Some(ack);
                Ok(Route::Login)
            }
            Err(e) => {
                self.register_error = Some(register_error_message(&e));
                Err(e.into())
            }
        }
    }
}
