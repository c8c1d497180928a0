use chrono::Utc;
use sea_orm::{TransactionTrait, prelude::*, sea_query::OnConflict};

use crate::{
    Currency, EngineError, MoneyCents, ResultEngine, StoreEvent, UserSettings,
    user_settings::{self, SETTINGS_ID},
};

use super::{Engine, with_tx};

impl Engine {
    /// Returns the settings row, creating it with defaults on first access.
    pub async fn settings(&self) -> ResultEngine<UserSettings> {
        with_tx!(self, |db_tx| {
            if let Some(model) = user_settings::Entity::find_by_id(SETTINGS_ID)
                .one(&db_tx)
                .await?
            {
                UserSettings::try_from(model)
            } else {
                let defaults = UserSettings::defaults(Utc::now());
                user_settings::Entity::insert(user_settings::ActiveModel::from(&defaults))
                    .on_conflict(
                        OnConflict::column(user_settings::Column::Id)
                            .do_nothing()
                            .to_owned(),
                    )
                    .do_nothing()
                    .exec(&db_tx)
                    .await?;
                tracing::info!("created default user settings");
                Ok(defaults)
            }
        })
    }

    /// Writes every field of `settings` and stamps `last_updated`.
    pub async fn save_settings(&self, settings: UserSettings) -> ResultEngine<UserSettings> {
        if settings.monthly_budget < MoneyCents::ZERO {
            return Err(EngineError::Validation(
                "Please enter a valid budget amount".to_string(),
            ));
        }
        if settings.monthly_salary < MoneyCents::ZERO {
            return Err(EngineError::Validation(
                "Please enter a valid salary amount".to_string(),
            ));
        }
        settings.monthly_budget.ensure_accepted()?;
        settings.monthly_salary.ensure_accepted()?;
        let settings = UserSettings {
            last_updated: Utc::now(),
            ..settings
        };

        with_tx!(self, |db_tx| {
            user_settings::Entity::insert(user_settings::ActiveModel::from(&settings))
                .on_conflict(
                    OnConflict::column(user_settings::Column::Id)
                        .update_columns([
                            user_settings::Column::MonthlySalaryMinor,
                            user_settings::Column::MonthlyBudgetMinor,
                            user_settings::Column::Currency,
                            user_settings::Column::BudgetAlertsEnabled,
                            user_settings::Column::LastUpdated,
                        ])
                        .to_owned(),
                )
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(())
        })?;
        tracing::debug!("user settings saved");
        self.publish(StoreEvent::SettingsChanged);
        Ok(settings)
    }

    pub async fn set_monthly_budget(&self, budget: MoneyCents) -> ResultEngine<UserSettings> {
        let settings = self.settings().await?;
        self.save_settings(UserSettings {
            monthly_budget: budget,
            ..settings
        })
        .await
    }

    pub async fn set_monthly_salary(&self, salary: MoneyCents) -> ResultEngine<UserSettings> {
        let settings = self.settings().await?;
        self.save_settings(UserSettings {
            monthly_salary: salary,
            ..settings
        })
        .await
    }

    pub async fn set_currency(&self, currency: Currency) -> ResultEngine<UserSettings> {
        let settings = self.settings().await?;
        self.save_settings(UserSettings {
            currency,
            ..settings
        })
        .await
    }

    pub async fn set_budget_alerts_enabled(&self, enabled: bool) -> ResultEngine<UserSettings> {
        let settings = self.settings().await?;
        self.save_settings(UserSettings {
            budget_alerts_enabled: enabled,
            ..settings
        })
        .await
    }
}
