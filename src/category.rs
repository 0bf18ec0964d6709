use log::debug;
use serde::Serialize;

use crate::config::CategoryConfig;
use crate::model::DisplayMenu;
use crate::slug::slugify;

/// Display name, claim key on the menu API (when the API can filter by it)
const DEFAULT_CATEGORIES: &[(&str, Option<&str>)] = &[
    ("Rendah Gula", Some("low_sugar")),
    ("Rendah Lemak", Some("low_fat")),
    ("Rendah Kalori", Some("low_calorie")),
    ("Tinggi Protein", Some("high_protein")),
    ("Tinggi Serat", Some("high_fiber")),
    ("Vegetarian", Some("vegetarian")),
    ("Vegan", Some("vegan")),
    ("Bebas Gluten", Some("gluten_free")),
    ("Seimbang", None),
    ("Organik", None),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub display_name: String,
    pub slug: String,
    pub backend_key: Option<String>,
}

impl Category {
    pub fn new(display_name: &str, backend_key: Option<&str>) -> Self {
        Self {
            display_name: display_name.to_string(),
            slug: slugify(display_name),
            backend_key: backend_key.map(str::to_string),
        }
    }

    fn matches(&self, claim: &str) -> bool {
        let claim = claim.trim();
        claim.eq_ignore_ascii_case(&self.display_name)
            || claim.eq_ignore_ascii_case(&self.slug)
            || self
                .backend_key
                .as_deref()
                .is_some_and(|key| claim.eq_ignore_ascii_case(key))
    }
}

/// Ordered dietary-claim categories.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTaxonomy {
    categories: Vec<Category>,
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, key)| Category::new(name, *key))
                .collect(),
        }
    }
}

impl CategoryTaxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Taxonomy from config entries, or the built-in one when none are given.
    pub fn from_config(entries: &[CategoryConfig]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        Self::new(
            entries
                .iter()
                .map(|entry| Category {
                    display_name: entry.name.clone(),
                    slug: entry
                        .slug
                        .as_deref()
                        .map(slugify)
                        .unwrap_or_else(|| slugify(&entry.name)),
                    backend_key: entry.backend_key.clone(),
                })
                .collect(),
        )
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn backend_key_for(&self, display_name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.display_name == display_name)
            .and_then(|c| c.backend_key.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuGroup<'a> {
    pub category: &'a Category,
    pub menus: Vec<&'a DisplayMenu>,
}

/// Group menus by their claims, in taxonomy order.
///
/// A menu lands in every group one of its claims matches, so groups can
/// share members. Menus keep their feed order inside a group, and
/// categories nobody claims are left out.
pub fn group_by_claim<'a>(
    menus: &'a [DisplayMenu],
    taxonomy: &'a CategoryTaxonomy,
) -> Vec<MenuGroup<'a>> {
    let groups: Vec<MenuGroup<'a>> = taxonomy
        .categories
        .iter()
        .map(|category| MenuGroup {
            category,
            menus: menus
                .iter()
                .filter(|menu| menu.claims.iter().any(|claim| category.matches(claim)))
                .collect(),
        })
        .filter(|group| !group.menus.is_empty())
        .collect();

    debug!(
        "Grouped {} menus into {} of {} categories",
        menus.len(),
        groups.len(),
        taxonomy.categories.len()
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMenuRecord;
    use crate::normalize::MenuNormalizer;
    use serde_json::json;

    fn menu(id: &str, claims: serde_json::Value) -> DisplayMenu {
        MenuNormalizer::default().normalize(
            &RawMenuRecord::from_value(json!({ "id": id, "name": id, "claims": claims })),
            None,
        )
    }

    fn names<'a>(groups: &'a [MenuGroup<'a>]) -> Vec<&'a str> {
        groups.iter().map(|g| g.category.display_name.as_str()).collect()
    }

    fn ids<'a>(group: &'a MenuGroup<'a>) -> Vec<&'a str> {
        group.menus.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_fan_out_to_every_claimed_group() {
        let taxonomy = CategoryTaxonomy::default();
        let menus = vec![menu("m1", json!(["Seimbang", "Organik"]))];
        let groups = group_by_claim(&menus, &taxonomy);

        assert_eq!(names(&groups), vec!["Seimbang", "Organik"]);
        assert_eq!(ids(&groups[0]), vec!["m1"]);
        assert_eq!(ids(&groups[1]), vec!["m1"]);
    }

    #[test]
    fn test_unclaimed_menus_are_in_no_group() {
        let taxonomy = CategoryTaxonomy::default();
        let menus = vec![
            menu("empty", json!([])),
            menu("scalar", json!("Seimbang")),
            menu("missing", json!(null)),
            menu("unknown", json!(["Pedas"])),
        ];
        assert!(group_by_claim(&menus, &taxonomy).is_empty());
    }

    #[test]
    fn test_taxonomy_order_not_insertion_order() {
        let taxonomy = CategoryTaxonomy::default();
        let menus = vec![
            menu("a", json!(["Organik"])),
            menu("b", json!(["Vegan"])),
            menu("c", json!(["Rendah Gula"])),
        ];
        let groups = group_by_claim(&menus, &taxonomy);
        assert_eq!(names(&groups), vec!["Rendah Gula", "Vegan", "Organik"]);
    }

    #[test]
    fn test_feed_order_kept_within_group() {
        let taxonomy = CategoryTaxonomy::default();
        let menus = vec![
            menu("z", json!(["Vegan"])),
            menu("a", json!(["vegan"])),
            menu("m", json!(["Vegan", "Vegan"])),
        ];
        let groups = group_by_claim(&menus, &taxonomy);
        assert_eq!(ids(&groups[0]), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_claims_match_slug_and_backend_key() {
        let taxonomy = CategoryTaxonomy::default();
        let menus = vec![
            menu("by-key", json!(["high_protein"])),
            menu("by-slug", json!(["tinggi-protein"])),
        ];
        let groups = group_by_claim(&menus, &taxonomy);
        assert_eq!(names(&groups), vec!["Tinggi Protein"]);
        assert_eq!(ids(&groups[0]), vec!["by-key", "by-slug"]);
    }

    #[test]
    fn test_taxonomy_lookups() {
        let taxonomy = CategoryTaxonomy::default();
        assert_eq!(taxonomy.backend_key_for("Rendah Gula"), Some("low_sugar"));
        assert_eq!(taxonomy.backend_key_for("Seimbang"), None);
        assert_eq!(taxonomy.backend_key_for("Tidak Ada"), None);
        assert_eq!(
            taxonomy.by_slug("bebas-gluten").map(|c| c.display_name.as_str()),
            Some("Bebas Gluten")
        );
    }

    #[test]
    fn test_from_config() {
        let taxonomy = CategoryTaxonomy::from_config(&[
            CategoryConfig {
                name: "Tanpa MSG".into(),
                slug: None,
                backend_key: Some("no_msg".into()),
            },
            CategoryConfig {
                name: "Keto".into(),
                slug: Some("Keto Friendly".into()),
                backend_key: None,
            },
        ]);
        assert_eq!(taxonomy.categories().len(), 2);
        assert_eq!(taxonomy.categories()[0].slug, "tanpa-msg");
        assert_eq!(taxonomy.categories()[1].slug, "keto-friendly");

        assert_eq!(CategoryTaxonomy::from_config(&[]), CategoryTaxonomy::default());
    }
}
