//! Recipe management service

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::types::generate_id;
use shared::validation::validate_name;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Recipe, RecipeType};
use crate::store::{DocumentStore, Repository};

#[derive(Clone)]
pub struct RecipeService {
    recipes: Repository<Recipe>,
}

/// Input for creating a recipe
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Recipe name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub recipe_type: RecipeType,
    pub base_weight_kg: Decimal,
    #[validate(range(min = 0, message = "Cook time cannot be negative"))]
    pub cook_time_minutes: i64,
    pub temperature: Option<Decimal>,
    pub notes: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub yield_ratio: Option<Decimal>,
    pub default_pack_size_kg: Option<Decimal>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn DocumentStore>, workspace: &str) -> Self {
        Self {
            recipes: Repository::new(store, workspace),
        }
    }

    pub async fn create_recipe(&self, input: CreateRecipeInput) -> AppResult<Recipe> {
        input.validate()?;
        validate_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;
        if input.base_weight_kg <= Decimal::ZERO {
            return Err(AppError::validation(
                "baseWeightKg",
                "Base weight must be positive",
            ));
        }

        let recipe = Recipe {
            id: input.id.unwrap_or_else(|| generate_id("RCP")),
            name: input.name.trim().to_string(),
            recipe_type: input.recipe_type,
            base_weight_kg: input.base_weight_kg,
            cook_time_minutes: input.cook_time_minutes,
            temperature: input.temperature,
            notes: input.notes,
            image_url: input.image_url,
            yield_ratio: input.yield_ratio,
            default_pack_size_kg: input.default_pack_size_kg,
        };

        self.recipes.put(&recipe).await?;
        tracing::info!("Created recipe {} ({})", recipe.name, recipe.id);
        Ok(recipe)
    }

    /// All recipes, alphabetical
    pub async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let mut recipes = self.recipes.list().await?;
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(recipes)
    }

    pub async fn get_recipe(&self, id: &str) -> AppResult<Recipe> {
        self.recipes.require(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Recipe>> {
        Ok(self.recipes.list().await?.into_iter().find(|r| r.name == name))
    }

    pub async fn delete_recipe(&self, id: &str) -> AppResult<()> {
        if !self.recipes.delete(id).await? {
            return Err(AppError::NotFound(format!("Recipe {}", id)));
        }
        tracing::info!("Deleted recipe {}", id);
        Ok(())
    }
}
