//! Fill the database with random recipes for local development.
//!
//! ```text
//! recettes-seed [count] [--clear]
//! ```
//!
//! Recipes are owned by `seed@recettes.local`, created on first run.
//! `--clear` deletes every existing recipe first.

use anyhow::{bail, Context};
use rand::seq::IndexedRandom;
use rand::Rng;
use recettes_api::auth::password::hash_password;
use recettes_api::config::default_image_url_from_env;
use recettes_core::recipe::{IngredientLine, RecipeDraft};
use recettes_core::types::DbId;
use recettes_db::models::user::CreateUser;
use recettes_db::repositories::{RecipeRepo, UserRepo};
use recettes_db::{DbPool, SchemaCapabilities};

const DEFAULT_COUNT: usize = 60;
const SEED_EMAIL: &str = "seed@recettes.local";

const DISHES: &[&str] = &[
    "Tarte", "Soupe", "Gratin", "Salade", "Risotto", "Curry", "Quiche", "Ragoût", "Velouté",
    "Clafoutis",
];
const MAIN_INGREDIENTS: &[&str] = &[
    "tomate", "courgette", "poulet", "saumon", "champignons", "poireaux", "lentilles", "potiron",
    "chèvre", "aubergine",
];
const STYLES: &[&str] = &["maison", "rapide", "de grand-mère", "épicée", "du marché", "légère"];
const CUISINES: &[&str] = &[
    "Française", "Italienne", "Indienne", "Marocaine", "Japonaise", "Mexicaine",
];
const EXTRA_INGREDIENTS: &[(&str, &str)] = &[
    ("oignon", "pièce"),
    ("ail", "gousse"),
    ("huile d'olive", "c. à soupe"),
    ("beurre", "g"),
    ("crème", "cl"),
    ("farine", "g"),
    ("riz", "g"),
    ("lait", "cl"),
    ("persil", "botte"),
    ("citron", "pièce"),
];

struct Args {
    count: usize,
    clear: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recettes_seed=info,recettes_db=info".into()),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = recettes_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    recettes_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    let caps = SchemaCapabilities::detect(&pool).await?;

    if args.clear {
        let removed = RecipeRepo::delete_all(&pool).await?;
        tracing::info!(removed, "Cleared existing recipes");
    }

    let owner = seed_owner(&pool).await?;
    let default_image_url = default_image_url_from_env();

    for _ in 0..args.count {
        let draft = random_recipe(&default_image_url);
        RecipeRepo::create(&pool, owner, &draft, caps)
            .await
            .with_context(|| format!("Failed to insert recipe '{}'", draft.title))?;
    }

    tracing::info!(count = args.count, owner, "Seeded recipes");
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args {
        count: DEFAULT_COUNT,
        clear: false,
    };
    for arg in args {
        match arg.as_str() {
            "--clear" => parsed.clear = true,
            other => match other.parse() {
                Ok(count) => parsed.count = count,
                Err(_) => bail!("Usage: recettes-seed [count] [--clear]"),
            },
        }
    }
    Ok(parsed)
}

/// Id of the seed account, creating it with an unusable random password.
async fn seed_owner(pool: &DbPool) -> anyhow::Result<DbId> {
    if let Some(user) = UserRepo::find_by_email(pool, SEED_EMAIL).await? {
        return Ok(user.id);
    }

    let password: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing error: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: Some("Recettes".to_string()),
            email: SEED_EMAIL.to_string(),
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "Created seed account");
    Ok(user.id)
}

fn random_recipe(default_image_url: &str) -> RecipeDraft {
    let mut rng = rand::rng();

    let dish = DISHES.choose(&mut rng).copied().unwrap_or("Tarte");
    let main = MAIN_INGREDIENTS.choose(&mut rng).copied().unwrap_or("tomate");
    let style = STYLES.choose(&mut rng).copied().unwrap_or("maison");

    let mut ingredients = vec![IngredientLine {
        name: main.to_string(),
        quantity: Some(rng.random_range(100..=600).to_string()),
        unit: Some("g".to_string()),
    }];
    let extras = rng.random_range(2..=5);
    let chosen: Vec<&(&str, &str)> = EXTRA_INGREDIENTS.choose_multiple(&mut rng, extras).collect();
    for (name, unit) in chosen {
        ingredients.push(IngredientLine {
            name: (*name).to_string(),
            quantity: Some(rng.random_range(1..=4).to_string()),
            unit: Some((*unit).to_string()),
        });
    }

    RecipeDraft {
        title: format!("{dish} {main} {style}"),
        description: Some(format!("Une recette {style} autour de {main}.")),
        image_url: default_image_url.to_string(),
        video_url: None,
        cuisine_type: CUISINES.choose(&mut rng).map(|c| (*c).to_string()),
        prep_time_minutes: rng.random_range(1..=24) * 5,
        servings: rng.random_range(1..=8),
        instructions: Some("Préparer les ingrédients, cuire, servir chaud.".to_string()),
        ingredients: Some(ingredients),
    }
}
