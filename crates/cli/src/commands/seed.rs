//! Database seeding command.
//!
//! Inserts a small demo catalog and one professional with a working week,
//! for local development. Idempotent: re-running changes nothing.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::CommandError;

/// Demo services: name, category, price in centavos, duration in minutes.
const SERVICES: &[(&str, &str, i64, i32)] = &[
    ("Corte feminino", "hair", 12000, 60),
    ("Corte masculino", "barber", 6000, 30),
    ("Escova", "hair", 8000, 45),
    ("Manicure", "nails", 4500, 45),
    ("Pedicure", "nails", 5500, 60),
    ("Limpeza de pele", "skin", 15000, 90),
    ("Maquiagem social", "makeup", 13000, 60),
];

/// Demo products: name, price in centavos, initial stock.
const PRODUCTS: &[(&str, i64, i32)] = &[
    ("Shampoo hidratante 300ml", 5490, 20),
    ("Condicionador 300ml", 5990, 20),
    ("Óleo reparador de pontas", 3990, 15),
    ("Esmalte vermelho", 1290, 30),
];

/// Seed the demo catalog and staff.
///
/// # Errors
///
/// Returns `CommandError` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    seed_services(&pool).await?;
    seed_products(&pool).await?;
    seed_professional(&pool).await?;

    tracing::info!("Seed complete");
    Ok(())
}

async fn seed_services(pool: &PgPool) -> Result<(), CommandError> {
    for &(name, category, price_cents, duration) in SERVICES {
        sqlx::query(
            "INSERT INTO service (name, category, price, duration_minutes)
             SELECT $1, $2, $3, $4
             WHERE NOT EXISTS (SELECT 1 FROM service WHERE name = $1)",
        )
        .bind(name)
        .bind(category)
        .bind(Decimal::new(price_cents, 2))
        .bind(duration)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = SERVICES.len(), "services seeded");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CommandError> {
    for &(name, price_cents, stock) in PRODUCTS {
        sqlx::query(
            "INSERT INTO product (name, price, stock_quantity)
             SELECT $1, $2, $3
             WHERE NOT EXISTS (SELECT 1 FROM product WHERE name = $1)",
        )
        .bind(name)
        .bind(Decimal::new(price_cents, 2))
        .bind(stock)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = PRODUCTS.len(), "products seeded");
    Ok(())
}

async fn seed_professional(pool: &PgPool) -> Result<(), CommandError> {
    let inserted: Option<(i32,)> = sqlx::query_as(
        "INSERT INTO professional (name, email, can_manage_schedule, commission_percent)
         VALUES ('Juliana Prado', 'juliana@solarastudio.com.br', TRUE, 40)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .fetch_optional(pool)
    .await?;

    let Some((professional_id,)) = inserted else {
        tracing::info!("demo professional already present");
        return Ok(());
    };

    // Tuesday through Saturday, 09:00-18:00.
    let starts = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
    let ends = NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default();
    for weekday in 1..=5_i16 {
        sqlx::query(
            "INSERT INTO working_hours (professional_id, weekday, starts_at, ends_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (professional_id, weekday) DO NOTHING",
        )
        .bind(professional_id)
        .bind(weekday)
        .bind(starts)
        .bind(ends)
        .execute(pool)
        .await?;
    }

    tracing::info!(professional_id, "demo professional seeded");
    Ok(())
}
