use crate::config::AppConfig;
use anyhow::{bail, Context, Result};
use brewforge_core::{
    store::Stored,
    xml::serialize::{write_entities, write_recipes},
    ImportOptions, Importer, MashWizardBuilder, SpargeMethod, Store, Validator,
};
use brewforge_schemas::{
    equipment::Equipment, fermentable::Fermentable, hop::Hop, mash::Mash, misc::Misc,
    recipe::Recipe, style::Style, water::Water, yeast::Yeast, Entity, PropertyTables,
};
use clap::ValueEnum;
use std::{fs, path::Path};

/// Record types that can be listed or exported on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Library {
    Recipes,
    Hops,
    Fermentables,
    Miscs,
    Yeasts,
    Waters,
    Styles,
    Equipment,
    Mashes,
}

/// Command-line overrides for the mash calculation.
#[derive(Debug, Clone, Default)]
pub struct MashRequest {
    pub recipe: String,
    pub sparge: Option<SpargeMethod>,
    pub thickness_l_kg: Option<f64>,
    pub schedule_path: Option<String>,
}

fn open_store(config: &AppConfig) -> Result<Store> {
    Store::open(Path::new(&config.store_path))
        .with_context(|| format!("Failed to open store: {}", config.store_path))
}

fn save_store(store: &Store, config: &AppConfig) -> Result<()> {
    store
        .save(Path::new(&config.store_path))
        .with_context(|| format!("Failed to save store: {}", config.store_path))
}

fn find_recipe(store: &Store, name: &str) -> Result<brewforge_core::EntityId> {
    match store.find_by_name::<Recipe>(name) {
        Some(record) => Ok(record.id),
        None => bail!("No recipe named '{}' in the store", name),
    }
}

/// Checks a file against the BeerXML grammar without importing it.
/// Returns whether the document is acceptable.
pub fn validate_file(path: &str) -> Result<bool> {
    println!("\n--- [Workflow] Validating '{}' ---", path);
    let validator = Validator::new().context("Failed to load the BeerXML grammar")?;
    let report = validator.validate_file(Path::new(path))?;

    for issue in &report.ignored {
        println!("  ignored  line {:>4}: {}", issue.line, issue.message);
    }
    for issue in &report.fatal {
        println!("  ERROR    line {:>4}: {}", issue.line, issue.message);
    }
    println!(
        "{} ignored, {} fatal: {}",
        report.ignored.len(),
        report.fatal.len(),
        if report.is_valid() { "valid" } else { "invalid" }
    );
    Ok(report.is_valid())
}

pub fn import_file(config: &AppConfig, path: &str, force: bool) -> Result<()> {
    println!("\n--- [Workflow] Importing '{}' ---", path);
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path))?;

    let mut store = open_store(config)?;
    let tables = PropertyTables::new();
    let validator = Validator::new().context("Failed to load the BeerXML grammar")?;
    let options = ImportOptions {
        enforce_validation: config.enforce_validation && !force,
    };

    let report = {
        let mut importer = Importer::new(&mut store, &tables, &validator, options);
        importer.import_document(&bytes)?
    };

    for recipe in &report.recipes {
        let status = if recipe.is_valid() { "ok" } else { "NEEDS REVIEW" };
        println!("  Recipe '{}' (#{}): {}", recipe.name, recipe.id, status);
        for diagnostic in &recipe.diagnostics {
            println!("    - {}", diagnostic);
        }
    }
    for entity in &report.entities {
        let action = if entity.reused { "reused" } else { "created" };
        println!("  {} '{}' (#{}): {}", entity.kind, entity.name, entity.id, action);
        for diagnostic in &entity.diagnostics {
            println!("    - {}", diagnostic);
        }
    }
    for failure in &report.failures {
        println!("  FAILED: {}", failure);
    }

    save_store(&store, config)?;
    println!(
        "Imported {} recipe(s) and {} other record(s); {} failure(s).",
        report.recipes.len(),
        report.entities.len(),
        report.failures.len()
    );
    Ok(())
}

fn displayed<T: Stored>(store: &Store) -> Vec<&T> {
    store.iter::<T>().filter(|r| r.display).map(|r| &r.data).collect()
}

fn export_library<T: Stored>(store: &Store, tables: &PropertyTables) -> Result<String> {
    Ok(write_entities(displayed::<T>(store), T::table(tables))?)
}

/// Writes BeerXML for `library` to `output`, or to stdout.
pub fn export(config: &AppConfig, library: Library, name: Option<&str>, output: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    let tables = PropertyTables::new();

    let xml = match library {
        Library::Recipes => {
            let ids = match name {
                Some(name) => vec![find_recipe(&store, name)?],
                None => store.iter::<Recipe>().map(|r| r.id).collect(),
            };
            let docs = ids
                .into_iter()
                .map(|id| store.recipe_document(id))
                .collect::<Result<Vec<_>, _>>()?;
            write_recipes(&docs, &tables)?
        }
        Library::Hops => export_library::<Hop>(&store, &tables)?,
        Library::Fermentables => export_library::<Fermentable>(&store, &tables)?,
        Library::Miscs => export_library::<Misc>(&store, &tables)?,
        Library::Yeasts => export_library::<Yeast>(&store, &tables)?,
        Library::Waters => export_library::<Water>(&store, &tables)?,
        Library::Styles => export_library::<Style>(&store, &tables)?,
        Library::Equipment => export_library::<Equipment>(&store, &tables)?,
        Library::Mashes => export_library::<Mash>(&store, &tables)?,
    };

    match output {
        Some(path) => {
            fs::write(path, xml).with_context(|| format!("Failed to write {}", path))?;
            println!("Exported {:?} to '{}'", library, path);
        }
        None => print!("{}", xml),
    }
    Ok(())
}

fn list_names<T: Stored>(store: &Store) {
    for record in store.iter::<T>().filter(|r| r.display) {
        println!("  #{:<5} {}", record.id, record.data.name());
    }
}

pub fn list(config: &AppConfig, library: Library) -> Result<()> {
    let store = open_store(config)?;
    println!("\n--- {:?} in '{}' ---", library, config.store_path);
    match library {
        Library::Recipes => {
            for record in store.iter::<Recipe>() {
                let r = &record.data;
                println!(
                    "  #{:<5} {:<30} OG {:.3}  FG {:.3}  ABV {:.1}%",
                    record.id, r.name, r.est_og, r.est_fg, r.est_abv_pct
                );
            }
        }
        Library::Hops => list_names::<Hop>(&store),
        Library::Fermentables => list_names::<Fermentable>(&store),
        Library::Miscs => list_names::<Misc>(&store),
        Library::Yeasts => list_names::<Yeast>(&store),
        Library::Waters => list_names::<Water>(&store),
        Library::Styles => list_names::<Style>(&store),
        Library::Equipment => list_names::<Equipment>(&store),
        Library::Mashes => list_names::<Mash>(&store),
    }
    Ok(())
}

/// Runs the mash calculator on a stored recipe and saves the new steps.
pub fn run_mash(config: &AppConfig, request: &MashRequest) -> Result<()> {
    println!("\n--- [Workflow] Mash schedule for '{}' ---", request.recipe);
    let mut store = open_store(config)?;
    let recipe = find_recipe(&store, &request.recipe)?;

    let mut builder = MashWizardBuilder::new()
        .with_sparge(request.sparge.unwrap_or(config.mash.sparge))
        .with_thickness(request.thickness_l_kg.unwrap_or(config.mash.thickness_l_kg))
        .with_default_boiling_point(config.default_boiling_point_c);
    if let Some(path) = &request.schedule_path {
        builder = builder.with_schedule_logging_to_file(path);
    }
    let mut wizard = builder.build()?;

    // a failed run is not saved
    let outcome = wizard.run(&mut store, recipe)?;
    save_store(&store, config)?;

    println!(
        "  {:>3}  {:<24} {:<12} {:>8} {:>8} {:>8}",
        "#", "Step", "Type", "Water L", "Water C", "Rest C"
    );
    for step in &outcome.steps {
        println!(
            "  {:>3}  {:<24} {:<12} {:>8.2} {:>8.1} {:>8.1}",
            step.step_number,
            step.name,
            format!("{:?}", step.step_type),
            step.infuse_amount_l,
            step.infuse_temp_c,
            step.step_temp_c
        );
    }
    println!("Total water: {:.2} L", outcome.total_infused_l());
    for warning in &outcome.warnings {
        println!("  WARNING: {:?}", warning);
    }
    Ok(())
}
