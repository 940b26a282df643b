use crate::db::SurveyStore;
use crate::web::session::TokenService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SurveyStore>,
    pub tokens: TokenService,
    pub frontend_url: String, // base of public survey links
}

pub type SharedState = Arc<AppState>;
