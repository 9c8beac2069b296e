mod changeset;
mod config;
mod db;
mod entities;
mod error;
mod library;
mod models;
mod seed;

use sea_orm::{IntoActiveModel, Set};

use crate::{changeset::ChangeSet, config::Config, entities::movie, library::Library};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,castlist=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;
    let db = db::connect_and_migrate(&config.database_url).await?;
    let library = Library::new(db);

    seed::seed_if_empty(&library).await?;

    let count = library.count_movies().await?;
    println!("There are {count} movies!");
    for movie in library.list_movies().await? {
        println!("  - {} ({}, {})", movie.title, movie.primary_director, movie.year_released);
    }

    for movie in library.movies_with_cast().await? {
        match &movie.rating {
            Some(description) => println!("{} has a rating of {description}", movie.title),
            None => println!("{} is not rated", movie.title),
        }
        for member in &movie.cast {
            println!("  - {} played by {}", member.character_name, member.actor_name);
        }
    }

    let pg = library.find_rating_by_description("PG").await?;
    let mut changes = ChangeSet::new();
    changes.insert_movie(movie::ActiveModel {
        id: Default::default(),
        title: Set("SpaceBalls".to_string()),
        primary_director: Set("Mel Brooks".to_string()),
        year_released: Set(1987),
        genre: Set("Comedy".to_string()),
        rating_id: Set(pg.map(|r| r.id)),
    });
    changes.commit(library.db()).await?;

    let Some(added) = library.find_movie_by_title("SpaceBalls").await? else {
        anyhow::bail!("just-added movie not found");
    };
    println!("Added {} ({}) with id {}", added.title, added.year_released, added.id);

    let mut renamed = added.into_active_model();
    renamed.title = Set("SpaceBalls - the best movie ever".to_string());
    let mut changes = ChangeSet::new();
    changes.update_movie(renamed);
    changes.commit(library.db()).await?;

    let Some(renamed) = library.find_movie_by_title("SpaceBalls - the best movie ever").await?
    else {
        anyhow::bail!("renamed movie not found");
    };
    println!("Renamed it to {} (still id {})", renamed.title, renamed.id);

    let mut changes = ChangeSet::new();
    changes.remove_movie(renamed);
    changes.commit(library.db()).await?;

    let count = library.count_movies().await?;
    println!("After cleanup there are {count} movies again");

    Ok(())
}
