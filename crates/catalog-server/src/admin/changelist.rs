use catalog_search::{BoundField, RequestParameters};
use serde::Serialize;

use super::{ChangeListQuery, ModelAdmin, PAGE_VAR, SEARCH_VAR};

/// Pagination state. Numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
}

impl Page {
    /// Clamp `requested` into `1..=num_pages`. An empty listing still has
    /// one (empty) page.
    pub fn new(requested: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(per_page).max(1);
        Self {
            number: requested.clamp(1, num_pages),
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> usize {
        (self.number - 1) * self.per_page
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.per_page)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterChoice {
    pub label: String,
    pub query: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedListFilter {
    pub title: String,
    pub choices: Vec<FilterChoice>,
}

/// A query parameter carried through a form as a hidden input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

/// Everything the change-list template needs.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeList {
    pub title: String,
    pub verbose_name_plural: &'static str,
    pub path: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub page: Page,
    pub result_count: usize,
    pub full_count: usize,
    pub search_term: String,
    pub has_search: bool,
    pub advanced_search: Option<Vec<BoundField>>,
    /// Keyword and list-filter parameters kept by the advanced search form.
    pub advanced_hidden: Vec<HiddenField>,
    /// Advanced search and list-filter parameters kept by the keyword box.
    pub search_hidden: Vec<HiddenField>,
    pub list_filters: Vec<RenderedListFilter>,
    pub previous_query: Option<String>,
    pub next_query: Option<String>,
}

impl ChangeList {
    pub fn build(
        admin: &ModelAdmin,
        params: &RequestParameters,
        query: &ChangeListQuery,
        rows: Vec<Vec<String>>,
        full_count: usize,
    ) -> Self {
        let result_count = rows.len();
        let page = Page::new(query.page, admin.list_per_page, result_count);
        let page_query = |number: usize| params.with_value(PAGE_VAR, number.to_string()).to_query_string();

        Self {
            title: format!("Select {} to change", admin.model_name),
            verbose_name_plural: admin.verbose_name_plural,
            path: admin.path(),
            columns: admin.list_display.clone(),
            rows: page.slice(rows),
            page,
            result_count,
            full_count,
            search_term: query.search_term.clone(),
            has_search: !admin.search_fields.is_empty(),
            advanced_search: admin.search_form.as_ref().map(|form| form.bind(params, None)),
            advanced_hidden: hidden_fields(params, |name| {
                admin.search_form.as_ref().is_some_and(|form| form.contains(name))
            }),
            search_hidden: hidden_fields(params, |name| name == SEARCH_VAR),
            list_filters: admin
                .list_filter
                .iter()
                .map(|filter| render_list_filter(filter, params))
                .collect(),
            previous_query: page.has_previous().then(|| page_query(page.number - 1)),
            next_query: page.has_next().then(|| page_query(page.number + 1)),
        }
    }
}

/// Non-empty parameters other than the page number and the ones `owned`
/// by the form being rendered.
fn hidden_fields(params: &RequestParameters, owned: impl Fn(&str) -> bool) -> Vec<HiddenField> {
    params
        .iter()
        .filter(|(name, value)| *name != PAGE_VAR && !value.is_empty() && !owned(*name))
        .map(|(name, value)| HiddenField {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn render_list_filter(filter: &super::ListFilter, params: &RequestParameters) -> RenderedListFilter {
    let current = params.get(filter.field).unwrap_or_default();
    let base = params.without(filter.field).without(PAGE_VAR);

    let mut choices = vec![FilterChoice {
        label: "All".into(),
        query: base.to_query_string(),
        selected: current.is_empty(),
    }];
    choices.extend(filter.coercion.options().into_iter().map(|choice| FilterChoice {
        selected: current == choice.value,
        query: base.with_value(filter.field, choice.value).to_query_string(),
        label: choice.label,
    }));

    RenderedListFilter {
        title: filter.title.to_string(),
        choices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_pages_clamp_to_last() {
        let page = Page::new(9, 2, 5);
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.number, 3);
        assert_eq!(page.slice(vec![1, 2, 3, 4, 5]), vec![5]);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page = Page::new(1, 100, 0);
        assert_eq!(page.num_pages, 1);
        assert!(page.slice(Vec::<u8>::new()).is_empty());
    }

    #[test]
    fn forms_carry_each_others_parameters() {
        let admin = super::super::books::book_admin(100).unwrap();
        let params = RequestParameters::parse("q=dune&genre__exact=sci&min_price=5&p=2");
        let request = catalog_search::SearchRequest::new(admin.path(), params.clone());
        let query = admin.changelist_query(&request).unwrap();
        let cl = ChangeList::build(&admin, &params, &query, Vec::new(), 0);

        let names = |fields: &[HiddenField]| -> Vec<String> {
            fields.iter().map(|f| f.name.clone()).collect()
        };
        assert_eq!(names(&cl.advanced_hidden), vec!["q", "genre__exact"]);
        assert_eq!(names(&cl.search_hidden), vec!["genre__exact", "min_price"]);
        assert_eq!(cl.verbose_name_plural, "books");
    }

    #[test]
    fn list_filter_links_keep_other_parameters() {
        let filter = super::super::ListFilter::new(
            "genre",
            "Genre",
            catalog_search::Coercion::choices([("fan", "Fantasy"), ("sci", "Science Fiction")]),
        );
        let params = RequestParameters::parse("q=dune&genre=sci&p=2");
        let rendered = render_list_filter(&filter, &params);
        assert_eq!(rendered.choices.len(), 3);
        assert_eq!(rendered.choices[0].query, "q=dune");
        assert!(rendered.choices[2].selected);
        assert_eq!(rendered.choices[1].query, "q=dune&genre=fan");
    }
}
