//! The singleton settings row (salary, budget, currency, alert toggle).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, MoneyCents};

/// Primary key of the only settings row.
pub(crate) const SETTINGS_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub monthly_salary: MoneyCents,
    pub monthly_budget: MoneyCents,
    pub currency: Currency,
    pub budget_alerts_enabled: bool,
    pub last_updated: DateTime<Utc>,
}

impl UserSettings {
    /// Values written on first access: zero salary and budget, alerts on.
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            monthly_salary: MoneyCents::ZERO,
            monthly_budget: MoneyCents::ZERO,
            currency: Currency::default(),
            budget_alerts_enabled: true,
            last_updated: now,
        }
    }

    /// Returns `true` when a positive monthly budget is configured.
    pub fn has_budget(&self) -> bool {
        self.monthly_budget.is_positive()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub monthly_salary_minor: i64,
    pub monthly_budget_minor: i64,
    pub currency: String,
    pub budget_alerts_enabled: bool,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UserSettings> for ActiveModel {
    fn from(settings: &UserSettings) -> Self {
        Self {
            id: ActiveValue::Set(SETTINGS_ID),
            monthly_salary_minor: ActiveValue::Set(settings.monthly_salary.cents()),
            monthly_budget_minor: ActiveValue::Set(settings.monthly_budget.cents()),
            currency: ActiveValue::Set(settings.currency.code().to_string()),
            budget_alerts_enabled: ActiveValue::Set(settings.budget_alerts_enabled),
            last_updated: ActiveValue::Set(settings.last_updated),
        }
    }
}

impl TryFrom<Model> for UserSettings {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            monthly_salary: MoneyCents::new(model.monthly_salary_minor),
            monthly_budget: MoneyCents::new(model.monthly_budget_minor),
            currency: Currency::try_from(model.currency.as_str())?,
            budget_alerts_enabled: model.budget_alerts_enabled,
            last_updated: model.last_updated,
        })
    }
}
