use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::settings::{CompanySettings, UpdateSettingsRequest},
};

#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_settings<'e, E>(&self, executor: E) -> Result<CompanySettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Linha única (id = 1). Enquanto ninguém salvou nada, tratamos como "vazio".
        let settings = sqlx::query_as::<_, CompanySettings>(
            r#"
            SELECT company_name, document_number, address, phone, email, updated_at
              FROM company_settings
             WHERE id = 1
            "#,
        )
        .fetch_optional(executor)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        input: &UpdateSettingsRequest,
    ) -> Result<CompanySettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT (Insert or Update)
        let settings = sqlx::query_as::<_, CompanySettings>(
            r#"
            INSERT INTO company_settings (id, company_name, document_number, address, phone, email, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id)
            DO UPDATE SET
                company_name = EXCLUDED.company_name,
                document_number = EXCLUDED.document_number,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                updated_at = NOW()
            RETURNING company_name, document_number, address, phone, email, updated_at
            "#,
        )
        .bind(input.company_name.as_deref())
        .bind(input.document_number.as_deref())
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(settings)
    }
}
