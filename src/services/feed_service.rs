// src/services/feed_service.rs
use std::sync::Arc;

use log::{error, info};

use crate::models::post::Post;
use crate::repositories::ArtApi;

pub const GRID_COLUMNS: usize = 3;
const GRID_LEFT: u32 = 62;
const GRID_TOP: u32 = 789;
const COLUMN_SPACING: u32 = 527;
const ROW_SPACING: u32 = 719;
const CARD_HEIGHT: u32 = 663;
const MIN_PAGE_HEIGHT: u32 = 1500;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    Loading,
    Ready,
    Failed(String),
}

/// Absolute pixel position of a card on the feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPosition {
    pub left: u32,
    pub top: u32,
}

pub fn card_position(index: usize) -> CardPosition {
    let row = (index / GRID_COLUMNS) as u32;
    let col = (index % GRID_COLUMNS) as u32;
    CardPosition {
        left: GRID_LEFT + col * COLUMN_SPACING,
        top: GRID_TOP + row * ROW_SPACING,
    }
}

/// Minimum page height that fits `cards` cards on the grid.
pub fn page_height(cards: usize) -> u32 {
    let rows = cards.div_ceil(GRID_COLUMNS) as u32;
    (GRID_TOP + rows * ROW_SPACING + CARD_HEIGHT).max(MIN_PAGE_HEIGHT)
}

/// Case-insensitive substring match over title, description, each tag and
/// the creator's "first last" name. An empty query matches everything.
pub fn matches_query(post: &Post, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    let hit = |s: &str| s.to_lowercase().contains(&needle);

    hit(&post.title)
        || hit(&post.description)
        || post.tags.iter().any(|t| hit(t))
        || hit(&post.creator.full_name())
}

/// A post placed on the grid.
#[derive(Debug)]
pub struct FeedCard<'a> {
    pub post: &'a Post,
    pub position: CardPosition,
    pub image_url: Option<String>,
}

pub struct FeedLoader {
    api: Arc<dyn ArtApi>,
    posts: Vec<Post>,
    query: String,
    visible: Vec<usize>,
    state: FeedState,
}

impl FeedLoader {
    pub fn new(api: Arc<dyn ArtApi>) -> Self {
        Self {
            api,
            posts: Vec::new(),
            query: String::new(),
            visible: Vec::new(),
            state: FeedState::Loading,
        }
    }

    /// Fetches the whole collection once. A failure leaves the list empty.
    pub async fn load(&mut self) {
        match self.api.retrieve_all_posts().await {
            Ok(posts) => {
                info!("Loaded {} posts", posts.len());
                self.posts = posts;
                self.state = FeedState::Ready;
            }
            Err(e) => {
                error!("Failed to fetch posts: {}", e);
                self.posts.clear();
                self.state = FeedState::Failed("Failed to fetch posts".to_string());
            }
        }
        self.refilter();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Post> + '_ {
        self.visible.iter().map(|&i| &self.posts[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn cards(&self, api_base: &str) -> Vec<FeedCard<'_>> {
        self.filtered()
            .enumerate()
            .map(|(index, post)| FeedCard {
                post,
                position: card_position(index),
                image_url: post.thumbnail_url(api_base),
            })
            .collect()
    }

    pub fn page_height(&self) -> u32 {
        page_height(self.visible.len())
    }

    fn refilter(&mut self) {
        self.visible = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, p)| matches_query(p, &self.query))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::mock::{sample_posts, ApiCall, InMemoryApi};

    fn ids<'a>(loader: &'a FeedLoader) -> Vec<&'a str> {
        loader.filtered().map(|p| p.id.as_str()).collect()
    }

    async fn loaded() -> (Arc<InMemoryApi>, FeedLoader) {
        let api = Arc::new(InMemoryApi::with_posts(sample_posts()));
        let mut loader = FeedLoader::new(api.clone());
        loader.load().await;
        (api, loader)
    }

    #[tokio::test]
    async fn load_issues_a_single_fetch() {
        let (api, loader) = loaded().await;
        assert_eq!(loader.state(), &FeedState::Ready);
        assert_eq!(loader.filtered_len(), 4);
        assert_eq!(api.calls().await, vec![ApiCall::RetrieveAll]);
    }

    #[tokio::test]
    async fn failed_load_stores_error_and_no_posts() {
        let mut loader = FeedLoader::new(Arc::new(InMemoryApi::unreachable()));
        assert_eq!(loader.state(), &FeedState::Loading);
        loader.load().await;
        assert_eq!(
            loader.state(),
            &FeedState::Failed("Failed to fetch posts".into())
        );
        assert_eq!(loader.filtered_len(), 0);
    }

    #[tokio::test]
    async fn query_matches_each_searchable_field() {
        let (_, mut loader) = loaded().await;

        loader.set_query("KOVALAM");
        assert_eq!(ids(&loader), ["p1"]);

        loader.set_query("terracotta");
        assert_eq!(ids(&loader), ["p3"]);

        loader.set_query("madhu");
        assert_eq!(ids(&loader), ["p2"]);

        loader.set_query("Sketch");
        assert_eq!(ids(&loader), ["p4"]);

        loader.set_query("anu menon");
        assert_eq!(ids(&loader), ["p1", "p4"]);

        // The name is matched as one "first last" string.
        loader.set_query("u m");
        assert_eq!(ids(&loader), ["p1", "p4"]);
    }

    #[tokio::test]
    async fn filter_is_exactly_the_matching_posts() {
        let (_, mut loader) = loaded().await;
        for query in ["a", "o", "rao", "zzz", "", "folk", "canvas"] {
            loader.set_query(query);
            let expected: Vec<&str> = loader
                .posts()
                .iter()
                .filter(|p| {
                    let q = query.to_lowercase();
                    p.title.to_lowercase().contains(&q)
                        || p.description.to_lowercase().contains(&q)
                        || p.tags.iter().any(|t| t.to_lowercase().contains(&q))
                        || format!("{} {}", p.creator.first_name, p.creator.last_name)
                            .to_lowercase()
                            .contains(&q)
                })
                .map(|p| p.id.as_str())
                .collect();
            assert_eq!(ids(&loader), expected, "query {:?}", query);
        }
    }

    #[tokio::test]
    async fn cards_are_laid_out_three_per_row() {
        let (_, loader) = loaded().await;
        let cards = loader.cards("http://api");
        let positions: Vec<(u32, u32)> = cards
            .iter()
            .map(|c| (c.position.left, c.position.top))
            .collect();
        assert_eq!(
            positions,
            [(62, 789), (589, 789), (1116, 789), (62, 1508)]
        );
        assert_eq!(cards[0].image_url.as_deref(), Some("http://api/uploads/p1.png"));
        assert_eq!(loader.page_height(), 789 + 2 * 719 + 663);
    }

    #[test]
    fn page_height_never_drops_below_minimum() {
        assert_eq!(page_height(0), 1500);
        assert_eq!(page_height(3), 789 + 719 + 663);
        assert_eq!(page_height(4), page_height(6));
    }
}
