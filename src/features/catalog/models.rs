use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// 車両カテゴリー
///
/// バックエンドのカテゴリー文字列は取り込み時に`Category::normalize`で
/// この語彙へ正規化する。未知の値は小文字化して`Other`に保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Sedan,
    Suv,
    Electric,
    Sports,
    Economy,
    Compact,
    Luxury,
    Other(String),
}

/// カテゴリー文字列の正規化テーブル
static CATEGORY_ALIASES: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    HashMap::from([
        ("sedan", Category::Sedan),
        ("standard", Category::Sedan),
        ("suv", Category::Suv),
        ("electric", Category::Electric),
        ("ev", Category::Electric),
        ("sports", Category::Sports),
        ("sport", Category::Sports),
        ("convertible", Category::Sports),
        ("economy", Category::Economy),
        ("compact", Category::Compact),
        ("luxury", Category::Luxury),
    ])
});

impl Category {
    /// バックエンドやフィルタータグの文字列をカテゴリーに正規化する
    ///
    /// 部分一致は行わず、前後の空白を除いた小文字の完全一致でテーブルを引く
    pub fn normalize(raw: &str) -> Category {
        let key = raw.trim().to_lowercase();
        CATEGORY_ALIASES
            .get(key.as_str())
            .cloned()
            .unwrap_or(Category::Other(key))
    }

    /// 正規化後のタグ文字列
    pub fn as_tag(&self) -> &str {
        match self {
            Category::Sedan => "sedan",
            Category::Suv => "suv",
            Category::Electric => "electric",
            Category::Sports => "sports",
            Category::Economy => "economy",
            Category::Compact => "compact",
            Category::Luxury => "luxury",
            Category::Other(tag) => tag,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> String {
        match self {
            Category::Sedan => "Sedan".to_string(),
            Category::Suv => "SUV".to_string(),
            Category::Electric => "Electric".to_string(),
            Category::Sports => "Sports".to_string(),
            Category::Economy => "Economy".to_string(),
            Category::Compact => "Compact".to_string(),
            Category::Luxury => "Luxury".to_string(),
            Category::Other(tag) => {
                let mut chars = tag.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::normalize(&raw))
    }
}

/// バックエンドから受け取る車両データ（取り込み前）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVehicle {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    model: String,
    #[serde(default, alias = "type")]
    category: Category,
    #[serde(deserialize_with = "deserialize_price")]
    price: f64,
    #[serde(default = "default_seats")]
    seats: u32,
    #[serde(default = "default_transmission")]
    transmission: String,
    #[serde(default)]
    fuel_type: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    mpg: Option<String>,
    #[serde(default)]
    image: String,
    #[serde(default, alias = "specifications")]
    features: Vec<String>,
}

fn default_seats() -> u32 {
    5
}

fn default_transmission() -> String {
    "Automatic".to_string()
}

/// 車両データ
///
/// 取得後は読み取り専用のスナップショットとして扱う。
/// 燃料タイプが"electric"の場合はカテゴリーを`Electric`に上書きして取り込む。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawVehicle")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub category: Category,
    /// 1日あたりの料金（ドル、受け取った値のまま保持する）
    pub price: f64,
    pub seats: u32,
    pub transmission: String,
    pub fuel_type: String,
    /// 燃費（"28/35"など）
    pub mpg: Option<String>,
    pub image: String,
    pub features: Vec<String>,
}

impl From<RawVehicle> for Vehicle {
    fn from(raw: RawVehicle) -> Self {
        let category = if raw.fuel_type.trim().eq_ignore_ascii_case("electric") {
            Category::Electric
        } else {
            raw.category
        };

        Self {
            id: raw.id,
            name: raw.name,
            brand: raw.brand,
            model: raw.model,
            category,
            price: raw.price,
            seats: raw.seats,
            transmission: raw.transmission,
            fuel_type: raw.fuel_type,
            mpg: raw.mpg,
            image: raw.image,
            features: raw.features,
        }
    }
}

impl Vehicle {
    /// 表示名（名前が空の場合はブランドとモデルから組み立てる）
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        format!("{} {}", self.brand, self.model).trim().to_string()
    }

    /// フィルターや類似車両の判定に使うカテゴリー
    pub fn effective_category(&self) -> Category {
        if self.fuel_type.trim().eq_ignore_ascii_case("electric") {
            Category::Electric
        } else {
            self.category.clone()
        }
    }

    /// 画像のパス
    pub fn image_path(&self) -> String {
        if self.image.starts_with('/') || self.image.starts_with("http") {
            self.image.clone()
        } else {
            format!("/images/{}", self.image)
        }
    }

    /// 一覧カードの概要表示（"suv • Automatic • 5 Seats"）
    pub fn summary_line(&self) -> String {
        format!(
            "{} • {} • {} Seats",
            self.category.label(),
            self.transmission,
            self.seats
        )
    }
}

/// 文字列・数値のどちらでも受け付ける値
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(number) => number.to_string(),
            TextOrNumber::Float(number) => number.to_string(),
        }
    }
}

/// IDは文字列と数値のどちらでも受け付ける
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(TextOrNumber::deserialize(deserializer)?.into())
}

/// 燃費などの任意項目（null・文字列・数値）
fn deserialize_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// 料金は丸めずにそのまま取り込む（非有限値・負の値は拒否）
fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!("不正な料金です: {value}")));
    }
    Ok(value)
}

/// 車両レコードを1件ずつ取り込む
///
/// 不正なレコードは警告ログを出してスキップし、残りの車両は表示する
pub(crate) fn ingest_vehicles(records: Vec<Value>) -> Vec<Vehicle> {
    let received = records.len();
    let vehicles: Vec<Vehicle> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Vehicle>(record) {
            Ok(vehicle) => Some(vehicle),
            Err(e) => {
                log::warn!("不正な車両データをスキップしました: {e}");
                None
            }
        })
        .collect();

    if vehicles.len() < received {
        log::warn!(
            "車両データの一部を取り込めませんでした: received={received}, accepted={}",
            vehicles.len()
        );
    }
    vehicles
}

/// 車両一覧APIのレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarsPage {
    pub cars: Vec<Vehicle>,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default = "default_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

fn default_page() -> u32 {
    1
}

/// 一覧APIのページ情報（車両は取り込み前）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCarsPage {
    #[serde(default)]
    cars: Vec<Value>,
    #[serde(default = "default_page")]
    current_page: u32,
    #[serde(default = "default_page")]
    total_pages: u32,
    total: Option<u64>,
}

/// 一覧APIはページ付きオブジェクトか配列のどちらかを返す
///
/// 車両は`ingest_vehicles`で1件ずつ取り込むため、一部の不正なレコードで
/// 一覧全体が失敗することはない
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CarsResponse {
    Paged(RawCarsPage),
    List(Vec<Value>),
}

impl From<CarsResponse> for CarsPage {
    fn from(response: CarsResponse) -> Self {
        match response {
            CarsResponse::Paged(page) => {
                let cars = ingest_vehicles(page.cars);
                CarsPage {
                    total: page.total.unwrap_or(cars.len() as u64),
                    cars,
                    current_page: page.current_page,
                    total_pages: page.total_pages,
                }
            }
            CarsResponse::List(records) => {
                let cars = ingest_vehicles(records);
                CarsPage {
                    total: cars.len() as u64,
                    cars,
                    current_page: 1,
                    total_pages: 1,
                }
            }
        }
    }
}

/// 車両一覧APIのクエリ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarQuery {
    pub category: Option<Category>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CarQuery {
    /// カテゴリーのみを指定したクエリ
    pub fn by_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// クエリパラメータに変換する（未指定の項目は含めない）
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_tag().to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}
