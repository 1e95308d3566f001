use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the `catalog` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogItem {
    pub item_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

/// `{"items": [...]}`, the shape of both the seed document and the live list reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogItems {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Request body for create/update. Every field is optional so the same shape serves
/// a full create and a partial update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ItemFields {
    #[serde(default)]
    pub item_id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ItemFields {
    /// Builds a new row from a create body.
    ///
    /// `item_id` (> 0) and a non-empty `name` are required; the rest default to empty/zero.
    pub fn into_new_item(self) -> Result<CatalogItem, String> {
        let item_id = match self.item_id {
            Some(id) if id > 0 => id,
            Some(id) => return Err(format!("item_id must be positive, got {}", id)),
            None => return Err("item_id is required".to_string()),
        };
        let name = match self.name {
            Some(n) if !n.is_empty() => n,
            _ => return Err("name is required".to_string()),
        };
        Ok(CatalogItem {
            item_id,
            name,
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
        })
    }
}

impl CatalogItem {
    /// Overlays the supplied fields; anything absent keeps its current value.
    /// `item_id` is never changed by an update.
    pub fn apply(&mut self, fields: ItemFields) {
        if let Some(name) = fields.name {
            self.name = name;
        }
        if let Some(description) = fields.description {
            self.description = description;
        }
        if let Some(price) = fields.price {
            self.price = price;
        }
        if let Some(image) = fields.image {
            self.image = image;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> CatalogItem {
        CatalogItem {
            item_id: 1,
            name: "Widget".to_string(),
            description: "d".to_string(),
            price: 9.99,
            image: "w.png".to_string(),
        }
    }

    #[test]
    fn apply_only_overwrites_supplied_fields() {
        let mut item = widget();
        item.apply(ItemFields {
            name: Some("X".to_string()),
            ..Default::default()
        });
        assert_eq!(item.name, "X");
        assert_eq!(item.description, "d");
        assert_eq!(item.price, 9.99);
        assert_eq!(item.image, "w.png");

        item.apply(ItemFields {
            item_id: Some(7),
            price: Some(1.5),
            image: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(item.item_id, 1);
        assert_eq!(item.price, 1.5);
        assert_eq!(item.image, "");
    }

    #[test]
    fn new_item_requires_id_and_name() {
        assert!(ItemFields::default().into_new_item().is_err());
        assert!(ItemFields {
            item_id: Some(0),
            name: Some("n".into()),
            ..Default::default()
        }
        .into_new_item()
        .is_err());
        assert!(ItemFields {
            item_id: Some(3),
            name: Some(String::new()),
            ..Default::default()
        }
        .into_new_item()
        .is_err());

        let item = ItemFields {
            item_id: Some(3),
            name: Some("Gizmo".into()),
            ..Default::default()
        }
        .into_new_item()
        .unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn item_json_uses_column_names() {
        let v = serde_json::to_value(widget()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "item_id": 1,
                "name": "Widget",
                "description": "d",
                "price": 9.99,
                "image": "w.png"
            })
        );
    }
}
