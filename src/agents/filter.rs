// ABOUTME: Allergen safety filter applied as a non-bypassable post-processing gate
// ABOUTME: Expands allergens to derivative ingredient terms and drops matching recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Allergen Filter
//!
//! Pure, deterministic, case-insensitive filter over generated recipes. The
//! agents ask the model to avoid allergens, but this filter is the only
//! mandatory guarantee: every recipe that survives contains no ingredient
//! matching the user's allergens or their known derivatives.
//!
//! Matching is by substring, which is a deliberate safety-over-precision
//! tradeoff: the term "peanut" catches "peanut butter", at the cost of
//! false positives for coincidental substrings ("egg" also flags
//! "eggplant"). That conservative bias is intended behavior.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::models::Recipe;

/// Known derivative ingredient terms for a named allergen
fn derivative_terms(allergen: &str) -> &'static [&'static str] {
    match allergen {
        "peanuts" => &[
            "peanut",
            "peanut butter",
            "peanut oil",
            "groundnut",
            "arachis oil",
        ],
        "tree nuts" => &[
            "almond",
            "cashew",
            "walnut",
            "pecan",
            "pistachio",
            "hazelnut",
            "macadamia",
            "brazil nut",
            "pine nut",
            "chestnut",
            "almond milk",
            "almond butter",
            "cashew milk",
            "walnut oil",
        ],
        "milk" | "dairy" => &[
            "milk",
            "dairy",
            "cheese",
            "butter",
            "cream",
            "yogurt",
            "ice cream",
            "whey",
            "casein",
            "lactose",
            "ghee",
            "sour cream",
            "half and half",
            "condensed milk",
            "evaporated milk",
            "cream cheese",
            "cottage cheese",
            "ricotta",
            "mozzarella",
            "parmesan",
            "cheddar",
            "brie",
            "feta",
        ],
        "eggs" => &[
            "egg",
            "eggs",
            "egg white",
            "egg yolk",
            "mayonnaise",
            "meringue",
            "albumin",
            "globulin",
            "lysozyme",
            "ovalbumin",
        ],
        "wheat" => &[
            "wheat",
            "flour",
            "bread",
            "pasta",
            "noodle",
            "cracker",
            "cookie",
            "cake",
            "pastry",
            "couscous",
            "bulgur",
            "semolina",
            "durum",
            "farina",
            "seitan",
            "breadcrumb",
        ],
        "gluten" => &[
            "wheat",
            "barley",
            "rye",
            "flour",
            "bread",
            "pasta",
            "noodle",
            "cracker",
            "cookie",
            "cake",
            "pastry",
            "couscous",
            "bulgur",
            "semolina",
            "seitan",
            "soy sauce",
            "malt",
        ],
        "soy" => &[
            "soy",
            "soya",
            "soybean",
            "tofu",
            "tempeh",
            "edamame",
            "miso",
            "soy sauce",
            "soy milk",
            "soy lecithin",
            "tamari",
        ],
        "fish" => &[
            "fish",
            "salmon",
            "tuna",
            "cod",
            "tilapia",
            "halibut",
            "sardine",
            "anchovy",
            "fish sauce",
            "worcestershire",
            "caesar dressing",
        ],
        "shellfish" => &[
            "shellfish",
            "shrimp",
            "crab",
            "lobster",
            "clam",
            "mussel",
            "oyster",
            "scallop",
            "crawfish",
            "crayfish",
            "prawn",
        ],
        "sesame" => &[
            "sesame",
            "sesame seed",
            "sesame oil",
            "tahini",
            "hummus",
            "halvah",
        ],
        _ => &[],
    }
}

/// Build the full lowercased term set for a list of allergens
fn allergen_terms(allergens: &[String]) -> HashSet<String> {
    let mut terms = HashSet::new();
    for allergen in allergens {
        let allergen_lower = allergen.trim().to_lowercase();
        if allergen_lower.is_empty() {
            continue;
        }
        for derivative in derivative_terms(&allergen_lower) {
            terms.insert((*derivative).to_owned());
        }
        terms.insert(allergen_lower);
    }
    terms
}

/// Check whether an ingredient name matches any allergen term
fn contains_allergen(ingredient_name: &str, terms: &HashSet<String>) -> bool {
    let ingredient_lower = ingredient_name.to_lowercase();

    if terms.contains(&ingredient_lower) {
        return true;
    }

    terms.iter().any(|term| ingredient_lower.contains(term))
}

/// Check a recipe's full ingredient surface (main and missing lists)
fn is_recipe_safe(recipe: &Recipe, terms: &HashSet<String>) -> bool {
    recipe
        .ingredients
        .iter()
        .chain(recipe.missing_ingredients.iter())
        .all(|ingredient| !contains_allergen(&ingredient.name, terms))
}

/// Filter out recipes that contain allergens.
///
/// With no allergens this is the identity function.
#[must_use]
pub fn filter_recipes(recipes: Vec<Recipe>, allergens: &[String]) -> Vec<Recipe> {
    if allergens.is_empty() {
        return recipes;
    }

    let total = recipes.len();
    info!(
        recipes = total,
        allergens = allergens.len(),
        "AllergenFilter: filtering recipes"
    );

    let terms = allergen_terms(allergens);
    let safe: Vec<Recipe> = recipes
        .into_iter()
        .filter(|recipe| {
            let keep = is_recipe_safe(recipe, &terms);
            if !keep {
                debug!(title = %recipe.title, "AllergenFilter: filtered out recipe");
            }
            keep
        })
        .collect();

    info!(
        passed = safe.len(),
        total, "AllergenFilter: recipes passed allergen check"
    );

    safe
}

/// Return the ingredient names in a recipe that trigger an allergen match,
/// without discarding the recipe. Empty when the recipe is safe or no
/// allergens are supplied.
#[must_use]
pub fn flagged_ingredients(recipe: &Recipe, allergens: &[String]) -> Vec<String> {
    if allergens.is_empty() {
        return Vec::new();
    }

    let terms = allergen_terms(allergens);
    recipe
        .ingredients
        .iter()
        .chain(recipe.missing_ingredients.iter())
        .filter(|ingredient| contains_allergen(&ingredient.name, &terms))
        .map(|ingredient| ingredient.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Ingredient, RecipeSource};

    fn recipe_with(names: &[&str], missing: &[&str]) -> Recipe {
        let to_ingredients = |names: &[&str], from_pantry: bool| {
            names
                .iter()
                .map(|n| Ingredient {
                    name: (*n).to_owned(),
                    amount: "1".into(),
                    unit: String::new(),
                    from_pantry,
                })
                .collect()
        };

        Recipe {
            title: "Test".into(),
            description: String::new(),
            cuisine: String::new(),
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            total_time_minutes: 0,
            servings: 2,
            difficulty: Difficulty::Easy,
            ingredients: to_ingredients(names, true),
            instructions: vec![],
            missing_ingredients: to_ingredients(missing, false),
            calories_per_serving: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            tags: vec![],
            source: RecipeSource::PantryOnly,
        }
    }

    #[test]
    fn test_derivative_expansion_catches_casein() {
        let allergens = vec!["dairy".to_owned()];
        let recipes = vec![recipe_with(&["casein powder"], &[])];
        assert!(filter_recipes(recipes, &allergens).is_empty());
    }

    #[test]
    fn test_missing_list_is_also_checked() {
        let allergens = vec!["peanuts".to_owned()];
        let recipes = vec![recipe_with(&["rice"], &["peanut butter"])];
        assert!(filter_recipes(recipes, &allergens).is_empty());
    }

    #[test]
    fn test_case_insensitive_matching() {
        let allergens = vec!["Shellfish".to_owned()];
        let recipes = vec![recipe_with(&["Grilled SHRIMP"], &[])];
        assert!(filter_recipes(recipes, &allergens).is_empty());
    }

    // Known limitation of substring matching: the "eggs" term set flags
    // eggplant even though it contains no egg. Conservative by intent.
    #[test]
    fn test_substring_false_positive_eggplant() {
        let allergens = vec!["eggs".to_owned()];
        let recipes = vec![recipe_with(&["eggplant"], &[])];
        assert!(filter_recipes(recipes, &allergens).is_empty());
    }

    #[test]
    fn test_no_allergens_is_identity() {
        let recipes = vec![recipe_with(&["peanut butter"], &[])];
        let out = filter_recipes(recipes.clone(), &[]);
        assert_eq!(out.len(), recipes.len());
    }

    #[test]
    fn test_flagged_ingredients_reports_without_discarding() {
        let allergens = vec!["gluten".to_owned()];
        let recipe = recipe_with(&["bread", "tomato"], &["soy sauce"]);
        let flagged = flagged_ingredients(&recipe, &allergens);
        assert_eq!(flagged, vec!["bread".to_owned(), "soy sauce".to_owned()]);
    }

    #[test]
    fn test_unknown_allergen_matches_itself() {
        let allergens = vec!["cilantro".to_owned()];
        let recipes = vec![
            recipe_with(&["cilantro lime rice"], &[]),
            recipe_with(&["plain rice"], &[]),
        ];
        let out = filter_recipes(recipes, &allergens);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ingredients[0].name, "plain rice");
    }
}
