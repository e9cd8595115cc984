use tera::{Context, Tera};

use crate::{
    app_error::{AppError, AppResult},
    application::view_model::DashboardPage,
};

const DASHBOARD_NAME: &str = "dashboard.html";
static DASHBOARD_TEMPLATE: &str = include_str!("../../../templates/dashboard.html");

/// Compiled page templates. The `.html` name turns on Tera's autoescaping,
/// so registration data is always escaped on output.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(DASHBOARD_NAME, DASHBOARD_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("Could not compile dashboard template. {e}")))?;
        Ok(Self { tera })
    }

    pub fn render_dashboard(&self, page: &DashboardPage) -> AppResult<String> {
        let context = Context::from_serialize(page)
            .map_err(|e| AppError::Internal(format!("Could not build page context. {e}")))?;
        self.tera
            .render(DASHBOARD_NAME, &context)
            .map_err(|e| AppError::Internal(format!("Could not render dashboard. {e}")))
    }
}
