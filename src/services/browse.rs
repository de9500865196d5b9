//! Browse session state
//!
//! One [`BrowseSession`] per client: the active section and its list, an
//! optional search result set, and a [`Paginator`] over whichever list is
//! visible. Search results win over the section whenever they are non-empty.
//!
//! Searches are tagged with a generation number. Starting a search, clearing
//! it or switching sections bumps the generation, and a completion carrying
//! an older number is discarded, so a slow response can never overwrite the
//! results of a newer query.

use std::sync::Arc;

use crate::models::{ContentItem, Section, SessionView};
use crate::services::catalog::CatalogProvider;
use crate::services::metrics;
use crate::services::pagination::Paginator;
use crate::services::search::SearchOutcome;

/// Section contents computed once from the catalog. Handing out the same
/// `Arc` for a section keeps re-selecting it from resetting the page.
#[derive(Debug, Clone)]
pub struct SectionLists {
    lists: Vec<(Section, Arc<[ContentItem]>)>,
}

impl SectionLists {
    pub fn from_provider(provider: &CatalogProvider) -> Self {
        let lists = Section::ALL
            .iter()
            .map(|section| (*section, Arc::from(provider.section(*section))))
            .collect();
        Self { lists }
    }

    pub fn get(&self, section: Section) -> Arc<[ContentItem]> {
        self.lists
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, items)| Arc::clone(items))
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }
}

/// Handle for an in-flight search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone)]
pub struct BrowseSession {
    sections: Arc<SectionLists>,
    section: Section,
    section_items: Arc<[ContentItem]>,
    section_error: Option<String>,
    search_query: Option<String>,
    search_results: Option<Arc<[ContentItem]>>,
    search_error: Option<String>,
    is_searching: bool,
    search_generation: u64,
    paginator: Paginator<ContentItem>,
}

impl BrowseSession {
    /// New session on the default section, page 1
    pub fn new(sections: Arc<SectionLists>, page_size: usize) -> Self {
        let section = Section::default();
        let section_items = sections.get(section);
        let paginator = Paginator::new(Arc::clone(&section_items), page_size);
        Self {
            sections,
            section,
            section_items,
            section_error: None,
            search_query: None,
            search_results: None,
            search_error: None,
            is_searching: false,
            search_generation: 0,
            paginator,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn paginator(&self) -> &Paginator<ContentItem> {
        &self.paginator
    }

    /// True when search results replace the section list
    pub fn showing_search(&self) -> bool {
        self.search_results
            .as_ref()
            .map(|items| !items.is_empty())
            .unwrap_or(false)
    }

    /// Switch tabs. Any search (finished or in flight) is dropped.
    pub fn select_section(&mut self, section: Section) {
        let items = self.sections.get(section);
        self.show_section(section, items, None);
    }

    /// Switch tabs onto a list fetched elsewhere (the Movies tab shows the
    /// TMDB popular collection). `error` is reported alongside the list.
    pub fn show_section(
        &mut self,
        section: Section,
        items: Arc<[ContentItem]>,
        error: Option<String>,
    ) {
        self.section = section;
        self.section_items = items;
        self.section_error = error;
        self.reset_search();
        self.refresh_visible();
    }

    pub fn go_to_page(&mut self, page: i64) -> usize {
        self.paginator.go_to_page(page)
    }

    pub fn next_page(&mut self) -> usize {
        self.paginator.next_page()
    }

    pub fn prev_page(&mut self) -> usize {
        self.paginator.prev_page()
    }

    /// Start a search. A blank query clears the current results and returns
    /// `None`; otherwise the returned ticket must be handed back to
    /// [`finish_search`](Self::finish_search).
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            self.clear_search();
            return None;
        }

        self.search_generation += 1;
        self.is_searching = true;
        self.search_query = Some(query.to_string());
        self.search_error = None;

        Some(SearchTicket {
            generation: self.search_generation,
            query: query.to_string(),
        })
    }

    /// Apply a search result. Returns false (and changes nothing) when a
    /// newer search, a clear, or a section switch happened since `ticket`
    /// was issued.
    pub fn finish_search(&mut self, ticket: &SearchTicket, outcome: SearchOutcome) -> bool {
        if ticket.generation != self.search_generation {
            metrics::STALE_SEARCH_RESPONSES.inc();
            return false;
        }

        self.is_searching = false;
        self.search_error = outcome.error;
        self.search_results = Some(Arc::from(outcome.items));
        self.refresh_visible();
        true
    }

    pub fn clear_search(&mut self) {
        self.reset_search();
        self.refresh_visible();
    }

    /// Point the paginator at the visible list; a different list resets it
    /// to page 1
    fn refresh_visible(&mut self) {
        let visible = match &self.search_results {
            Some(results) if !results.is_empty() => Arc::clone(results),
            _ => Arc::clone(&self.section_items),
        };
        self.paginator.replace(visible);
    }

    pub fn view(&self, session_id: &str) -> SessionView {
        let section = self.section();
        let paginator = self.paginator();
        let showing_search = self.showing_search();
        let (title, description) = if showing_search {
            (
                "Search Results".to_string(),
                format!("Found {} results", paginator.total_items()),
            )
        } else {
            (section.title().to_string(), section.description().to_string())
        };

        SessionView {
            session_id: session_id.to_string(),
            section,
            title,
            description,
            showing_search,
            is_searching: self.is_searching(),
            search_query: self.search_query.clone(),
            search_error: self.search_error.clone(),
            section_error: self.section_error.clone(),
            search_generation: self.search_generation,
            summary: format!("{} results", paginator.range_label()),
            page: paginator.view(),
        }
    }

    fn reset_search(&mut self) {
        self.search_generation += 1;
        self.is_searching = false;
        self.search_query = None;
        self.search_results = None;
        self.search_error = None;
    }
}
