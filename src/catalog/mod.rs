use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::errors::{FeedError, Result};
use crate::models::equity::EquityInfo;
use crate::util::title_case;

/// 元数据目录中的分类索引（`meta_data` 字段）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogIndex {
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default, rename = "sector-industries")]
    pub sector_industries: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "sector-symbols")]
    pub sector_symbols: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "industry-symbols")]
    pub industry_symbols: BTreeMap<String, Vec<String>>,
}

/// 元数据目录的原始结构
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub equities: BTreeMap<String, EquityInfo>,
    #[serde(default)]
    pub sectors: BTreeMap<String, Vec<EquityInfo>>,
    #[serde(default)]
    pub industries: BTreeMap<String, Vec<EquityInfo>>,
    #[serde(default)]
    pub meta_data: CatalogIndex,
}

/// 行业/板块名称参数
///
/// 字符串参数按标题大小写规范化；JSON中的非字符串值返回 `InvalidArgumentType`。
pub trait CategoryArg {
    fn to_category(&self) -> Result<String>;
}

impl CategoryArg for &str {
    fn to_category(&self) -> Result<String> {
        Ok(title_case(self.trim()))
    }
}

impl CategoryArg for String {
    fn to_category(&self) -> Result<String> {
        self.as_str().to_category()
    }
}

impl CategoryArg for &String {
    fn to_category(&self) -> Result<String> {
        self.as_str().to_category()
    }
}

impl CategoryArg for &Value {
    fn to_category(&self) -> Result<String> {
        match self {
            Value::String(s) => s.as_str().to_category(),
            other => Err(FeedError::InvalidArgumentType(format!(
                "sector/industry must be a string, got {}",
                other
            ))),
        }
    }
}

impl CategoryArg for Value {
    fn to_category(&self) -> Result<String> {
        (&self).to_category()
    }
}

/// 股票元数据目录，加载后只读
pub struct EquityCatalog {
    data: CatalogData,
    // 代码索引，键为大写代码
    symbol_index: HashMap<String, String>,
}

impl EquityCatalog {
    /// 使用提供的数据创建目录
    pub fn new_with_data(data: CatalogData) -> Self {
        let mut catalog = Self {
            data,
            symbol_index: HashMap::new(),
        };

        catalog.rebuild_indices();

        info!(
            "Catalog loaded: {} equities, {} sectors, {} industries",
            catalog.data.equities.len(),
            catalog.data.meta_data.sectors.len(),
            catalog.data.meta_data.industries.len()
        );

        catalog
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Ok(Self::new_with_data(data))
    }

    /// 从本地文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// 从远程地址下载目录
    pub async fn fetch(client: &Client, url: &str) -> Result<Self> {
        info!("Downloading equity catalog from: {}", url);

        let resp = client.get(url).send().await?.error_for_status()?;
        let body = resp.text().await?;

        let data: CatalogData = serde_json::from_str(&body)
            .map_err(|e| FeedError::MalformedData(format!("catalog payload: {}", e)))?;

        Ok(Self::new_with_data(data))
    }

    /// 补全数据源未提供的索引
    fn rebuild_indices(&mut self) {
        self.symbol_index.clear();

        for (key, equity) in self.data.equities.iter_mut() {
            if equity.symbol.is_empty() {
                equity.symbol = key.clone();
            }
        }

        let mut sectors: BTreeMap<String, Vec<EquityInfo>> = BTreeMap::new();
        let mut industries: BTreeMap<String, Vec<EquityInfo>> = BTreeMap::new();
        let mut sector_industries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut sector_symbols: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut industry_symbols: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (key, equity) in &self.data.equities {
            self.symbol_index.insert(key.to_uppercase(), key.clone());

            if !equity.sector.is_empty() {
                sectors.entry(equity.sector.clone()).or_default().push(equity.clone());
                sector_symbols.entry(equity.sector.clone()).or_default().push(equity.symbol.clone());

                let industries_of_sector = sector_industries.entry(equity.sector.clone()).or_default();
                if !equity.industry.is_empty() && !industries_of_sector.contains(&equity.industry) {
                    industries_of_sector.push(equity.industry.clone());
                }
            }
            if !equity.industry.is_empty() {
                industries.entry(equity.industry.clone()).or_default().push(equity.clone());
                industry_symbols.entry(equity.industry.clone()).or_default().push(equity.symbol.clone());
            }
        }

        let data = &mut self.data;
        if data.sectors.is_empty() {
            data.sectors = sectors;
        }
        if data.industries.is_empty() {
            data.industries = industries;
        }
        let meta = &mut data.meta_data;
        if meta.sector_industries.is_empty() {
            meta.sector_industries = sector_industries;
        }
        if meta.sector_symbols.is_empty() {
            meta.sector_symbols = sector_symbols;
        }
        if meta.industry_symbols.is_empty() {
            meta.industry_symbols = industry_symbols;
        }
        if meta.sectors.is_empty() {
            meta.sectors = data.sectors.keys().cloned().collect();
        }
        if meta.industries.is_empty() {
            meta.industries = data.industries.keys().cloned().collect();
        }
    }

    /// 查找单只股票
    pub fn lookup(&self, symbol: &str) -> Result<&EquityInfo> {
        self.symbol_index
            .get(&symbol.trim().to_uppercase())
            .and_then(|key| self.data.equities.get(key))
            .ok_or_else(|| FeedError::NotFound(format!("symbol {}", symbol)))
    }

    /// 所有股票
    pub fn equities(&self) -> Vec<&EquityInfo> {
        self.data.equities.values().collect()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.data.equities.keys().map(|s| s.as_str()).collect()
    }

    pub fn sectors(&self) -> &[String] {
        &self.data.meta_data.sectors
    }

    pub fn industries(&self) -> &[String] {
        &self.data.meta_data.industries
    }

    /// 板块下的股票
    pub fn sector_equities<A: CategoryArg>(&self, sector: A) -> Result<&[EquityInfo]> {
        find_category(&self.data.sectors, &sector, "sector")
    }

    /// 行业下的股票
    pub fn industry_equities<A: CategoryArg>(&self, industry: A) -> Result<&[EquityInfo]> {
        find_category(&self.data.industries, &industry, "industry")
    }

    pub fn sector_industries<A: CategoryArg>(&self, sector: A) -> Result<&[String]> {
        find_category(&self.data.meta_data.sector_industries, &sector, "sector")
    }

    pub fn sector_symbols<A: CategoryArg>(&self, sector: A) -> Result<&[String]> {
        find_category(&self.data.meta_data.sector_symbols, &sector, "sector")
    }

    pub fn industry_symbols<A: CategoryArg>(&self, industry: A) -> Result<&[String]> {
        find_category(&self.data.meta_data.industry_symbols, &industry, "industry")
    }
}

// 先按标题大小写精确查找，再忽略大小写匹配
fn find_category<'a, T, A: CategoryArg>(
    map: &'a BTreeMap<String, Vec<T>>,
    arg: &A,
    kind: &str,
) -> Result<&'a [T]> {
    let name = arg.to_category()?;

    map.get(&name)
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.to_lowercase() == name.to_lowercase())
                .map(|(_, v)| v)
        })
        .map(|v| v.as_slice())
        .ok_or_else(|| FeedError::NotFound(format!("{} {}", kind, name)))
}
