use recipe_book_api::{
    config::AppConfig,
    constants::{ROLE_ADMIN, ROLE_USER},
    db::{DbPool, create_orm_conn, run_migrations, shared_pool},
    services::auth_service::hash_password,
};

const TAGS: &[(&str, &str)] = &[
    ("Breakfast", "breakfast"),
    ("Lunch", "lunch"),
    ("Dinner", "dinner"),
];

const INGREDIENTS: &[(&str, &str)] = &[
    ("flour", "g"),
    ("sugar", "g"),
    ("butter", "g"),
    ("milk", "ml"),
    ("eggs", "pcs"),
    ("salt", "pinch"),
    ("olive oil", "tbsp"),
    ("onion", "pcs"),
    ("garlic", "clove"),
    ("tomatoes", "g"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = shared_pool(&orm);

    let admin_id = ensure_user(&pool, "admin@example.com", "admin", "admin12345", ROLE_ADMIN).await?;
    let user_id = ensure_user(&pool, "cook@example.com", "cook", "cook12345", ROLE_USER).await?;
    seed_tags(&pool).await?;
    seed_ingredients(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    email: &str,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i64> {
    let password_hash = hash_password(password)?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, username, first_name, last_name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(username)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

async fn seed_tags(pool: &DbPool) -> anyhow::Result<()> {
    for (name, slug) in TAGS {
        sqlx::query("INSERT INTO tags (name, slug) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(name)
            .bind(slug)
            .execute(pool)
            .await?;
    }
    println!("Seeded {} tags", TAGS.len());
    Ok(())
}

async fn seed_ingredients(pool: &DbPool) -> anyhow::Result<()> {
    for (name, unit) in INGREDIENTS {
        sqlx::query(
            r#"
            INSERT INTO ingredients (name, measurement_unit)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT unique_name_measurement DO NOTHING
            "#,
        )
        .bind(name)
        .bind(unit)
        .execute(pool)
        .await?;
    }
    println!("Seeded {} ingredients", INGREDIENTS.len());
    Ok(())
}
