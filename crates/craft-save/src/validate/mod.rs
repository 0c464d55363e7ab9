//! Consistency checks for savefile graphs.
//!
//! Decoders and the two mutation methods keep these invariants by
//! construction; validation is for graphs received from elsewhere or used in
//! tests after heavy mutation.

use rustc_hash::FxHashSet;

use crate::error::ValidationError;
use crate::model::{Savefile, Use};

/// Validates the structural invariants of a savefile.
///
/// Checks, in order:
/// - every element's id equals its position
/// - texts are unique and the text index points at the right element
/// - recipe ingredients exist and no result lists a pair twice
/// - use lists mirror the recipes (when use lists are enabled)
/// - stats match the content
pub fn validate_savefile(save: &Savefile) -> Result<(), ValidationError> {
    let elements = save.elements();

    let mut texts = FxHashSet::with_capacity_and_hasher(elements.len(), Default::default());
    for (position, element) in elements.iter().enumerate() {
        if element.id != position {
            return Err(ValidationError::IdMismatch {
                position,
                id: element.id,
            });
        }
        if !texts.insert(element.text.as_str()) {
            return Err(ValidationError::DuplicateText {
                text: element.text.clone(),
            });
        }
        if let Some(indexed) = save.id_of(&element.text).filter(|&id| id != position) {
            return Err(ValidationError::TextIndexMismatch {
                text: element.text.clone(),
                indexed,
                actual: position,
            });
        }
    }

    let mut recipe_count = 0;
    for element in elements {
        let mut seen = FxHashSet::with_capacity_and_hasher(element.recipes.len(), Default::default());
        for recipe in &element.recipes {
            for ingredient in [recipe.a, recipe.b] {
                if ingredient >= elements.len() {
                    return Err(ValidationError::DanglingIngredient {
                        result: element.id,
                        missing: ingredient,
                    });
                }
            }
            if !seen.insert(recipe.ordered()) {
                return Err(ValidationError::DuplicateRecipe {
                    result: element.id,
                    a: recipe.a,
                    b: recipe.b,
                });
            }
        }
        recipe_count += element.recipes.len();
    }

    if save.options().uses {
        validate_uses(save)?;
    }

    let stats = save.stats();
    let discoveries = elements.iter().filter(|e| e.discovered).count();
    for (field, recorded, actual) in [
        ("elements", stats.elements, elements.len()),
        ("discoveries", stats.discoveries, discoveries),
        ("recipes", stats.recipes, recipe_count),
    ] {
        if recorded != actual {
            return Err(ValidationError::StatsMismatch {
                field,
                recorded,
                actual,
            });
        }
    }

    Ok(())
}

/// Rebuilds every use list from the recipes and compares.
fn validate_uses(save: &Savefile) -> Result<(), ValidationError> {
    let mut expected: Vec<Vec<Use>> = vec![Vec::new(); save.len()];
    for element in save.elements() {
        for recipe in &element.recipes {
            expected[recipe.a].push(Use {
                other: recipe.b,
                result: element.id,
            });
            if recipe.a != recipe.b {
                expected[recipe.b].push(Use {
                    other: recipe.a,
                    result: element.id,
                });
            }
        }
    }

    for (element, mut expected) in save.elements().iter().zip(expected) {
        let mut actual = element.uses.clone();
        actual.sort_by_key(|u| (u.result, u.other));
        expected.sort_by_key(|u| (u.result, u.other));
        if actual != expected {
            return Err(ValidationError::UseMismatch { element: element.id });
        }
    }
    Ok(())
}
