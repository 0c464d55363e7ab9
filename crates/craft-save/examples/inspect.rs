//! Simple decoder to inspect savefiles of any supported format.

use std::fs;

use craft_save::util::format_millis_rfc3339;
use craft_save::{decode, Element, SaveOptions, Savefile};

const SHOWN_ELEMENTS: usize = 20;

fn format_element(save: &Savefile, element: &Element) -> String {
    let text = |id| save.element(id).map_or("?", |e| e.text.as_str());
    let mut line = format!("{} {}", element.emoji, element.text);
    if element.discovered {
        line.push_str(" (first discovery)");
    }
    if let Some(recipe) = element.recipes.first() {
        line.push_str(&format!(" = {} + {}", text(recipe.a), text(recipe.b)));
        if element.recipes.len() > 1 {
            line.push_str(&format!(" [+{} more]", element.recipes.len() - 1));
        }
    }
    line
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("usage: inspect <savefile>");

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let save = decode(&data, SaveOptions::default())
        .expect("Failed to decode")
        .expect("Unrecognized savefile format");

    println!("\n=== Savefile Info ===");
    if let Some(format) = save.format() {
        println!("Format: {}", format);
    }
    if !save.name().is_empty() {
        println!("Name: {}", save.name());
    }
    println!("Created: {}", format_millis_rfc3339(save.created()));
    println!("Stats: {}", save.stats());

    let most_used = save.elements().iter().max_by_key(|e| e.uses.len());
    if let Some(element) = most_used.filter(|e| !e.uses.is_empty()) {
        println!("Most used ingredient: {} ({} uses)", element.text, element.uses.len());
    }

    println!("\n=== First {} Elements ===", SHOWN_ELEMENTS.min(save.len()));
    for element in save.elements().iter().take(SHOWN_ELEMENTS) {
        println!("[{}] {}", element.id, format_element(&save, element));
    }
    if save.len() > SHOWN_ELEMENTS {
        println!("... and {} more elements", save.len() - SHOWN_ELEMENTS);
    }
}
