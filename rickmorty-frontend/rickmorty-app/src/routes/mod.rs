pub mod character_details;
pub mod characters_page;
pub mod header;
pub mod login;
pub mod register;

use std::fmt;

pub use character_details::CharacterDetailsPage;
pub use characters_page::CharactersPage;
pub use header::Header;
pub use login::LoginPage;
pub use register::RegisterPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Characters,
    CharacterDetails(u32),
    Login,
    Register,
}

impl Route {
    /// Maps a URL path onto a page. Unknown paths land on the character list,
    /// unknown paths under `/auth` land on login.
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["characters", id] => id
                .parse()
                .map(Route::CharacterDetails)
                .unwrap_or(Route::Characters),
            ["auth", "login"] => Route::Login,
            ["auth", "register"] => Route::Register,
            ["auth", ..] => Route::Login,
            _ => Route::Characters,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Characters => "/characters".to_string(),
            Route::CharacterDetails(id) => format!("/characters/{id}"),
            Route::Login => "/auth/login".to_string(),
            Route::Register => "/auth/register".to_string(),
        }
    }

    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
