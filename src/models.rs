use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct MovieWithCast {
    pub id: i32,
    pub title: String,
    pub primary_director: String,
    pub year_released: i32,
    pub genre: String,
    /// Rating description, or `None` for an unrated movie.
    pub rating: Option<String>,
    pub cast: Vec<CastMember>,
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CastMember {
    pub character_name: String,
    pub actor_name: String,
}
