// ==========================================
// 家禽生产分析系统 - 快照文件加载器
// ==========================================
// 支持: 全场快照 (.json) / 生产日报 (.csv)
// 日报 CSV 表头:
//   batch_id,date,daily_mortality,feed_consumed_kg,
//   water_consumed_l,average_weight_g,eggs_produced
// ==========================================

use crate::domain::records::DailyRecord;
use crate::domain::snapshot::FarmSnapshot;
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

fn check_file(path: &Path, expected_ext: &str) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(expected_ext) => Ok(()),
        Some(ext) => Err(ImportError::UnsupportedFormat(ext.to_string_lossy().to_string())),
        None => Err(ImportError::UnsupportedFormat(path.display().to_string())),
    }
}

// ==========================================
// 全场快照 (JSON)
// ==========================================

/// 从 JSON 文件加载全场快照
///
/// # 返回
/// - Err(ImportError::UnknownBatch): 存在引用未知批次的记录
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> ImportResult<FarmSnapshot> {
    let path = path.as_ref();
    check_file(path, "json")?;
    let raw = std::fs::read_to_string(path)?;
    let snapshot = parse_snapshot(&raw)?;
    info!(
        path = %path.display(),
        batches = snapshot.batches.len(),
        records = snapshot.record_count(),
        "快照加载完成"
    );
    Ok(snapshot)
}

pub fn parse_snapshot(raw: &str) -> ImportResult<FarmSnapshot> {
    let snapshot: FarmSnapshot = serde_json::from_str(raw)?;
    validate_references(&snapshot)?;
    Ok(snapshot)
}

fn validate_references(snapshot: &FarmSnapshot) -> ImportResult<()> {
    let known: HashSet<&str> = snapshot.batches.iter().map(|b| b.id.as_str()).collect();
    let referenced = snapshot
        .daily_records
        .iter()
        .map(|r| r.batch_id.as_str())
        .chain(snapshot.environmental_readings.iter().map(|r| r.batch_id.as_str()))
        .chain(snapshot.egg_records.iter().map(|r| r.batch_id.as_str()))
        .chain(snapshot.lighting_readings.iter().map(|r| r.batch_id.as_str()))
        .chain(snapshot.cost_snapshots.iter().map(|s| s.batch_id.as_str()))
        .chain(snapshot.behavior_observations.iter().map(|o| o.batch_id.as_str()));

    for id in referenced {
        if !known.contains(id) {
            return Err(ImportError::UnknownBatch(id.to_string()));
        }
    }
    Ok(())
}

// ==========================================
// 生产日报 (CSV)
// ==========================================

pub fn load_daily_records_csv<P: AsRef<Path>>(path: P) -> ImportResult<Vec<DailyRecord>> {
    let path = path.as_ref();
    check_file(path, "csv")?;
    let records = parse_daily_records_csv(File::open(path)?)?;
    info!(path = %path.display(), count = records.len(), "日报 CSV 加载完成");
    Ok(records)
}

/// 解析日报 CSV,行号从 1 开始 (不含表头)
pub fn parse_daily_records_csv<R: Read>(reader: R) -> ImportResult<Vec<DailyRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result?;
        let fields: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter().map(str::trim))
            .collect();

        // 跳过完全空白的行
        if fields.values().all(|v| v.is_empty()) {
            warn!(row, "跳过空白行");
            continue;
        }

        records.push(DailyRecord {
            batch_id: required(&fields, row, "batch_id")?.to_string(),
            date: parse_date(row, "date", required(&fields, row, "date")?)?,
            daily_mortality: parse_num(row, "daily_mortality", required(&fields, row, "daily_mortality")?)?,
            feed_consumed_kg: parse_num(row, "feed_consumed_kg", required(&fields, row, "feed_consumed_kg")?)?,
            water_consumed_l: optional(&fields, row, "water_consumed_l")?.unwrap_or(0.0),
            average_weight_g: optional(&fields, row, "average_weight_g")?,
            eggs_produced: optional(&fields, row, "eggs_produced")?.unwrap_or(0),
        });
    }
    Ok(records)
}

fn required<'a>(fields: &HashMap<&str, &'a str>, row: usize, field: &str) -> ImportResult<&'a str> {
    match fields.get(field) {
        Some(v) if !v.is_empty() => Ok(*v),
        _ => Err(ImportError::MissingField {
            row,
            field: field.to_string(),
        }),
    }
}

fn optional<T>(fields: &HashMap<&str, &str>, row: usize, field: &str) -> ImportResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match fields.get(field) {
        Some(v) if !v.is_empty() => parse_num(row, field, v).map(Some),
        _ => Ok(None),
    }
}

fn parse_num<T>(row: usize, field: &str, value: &str) -> ImportResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ImportError::TypeConversionError {
        row,
        field: field.to_string(),
        message: format!("{}: {}", value, e),
    })
}

fn parse_date(row: usize, field: &str, value: &str) -> ImportResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .map_err(|_| ImportError::DateFormatError {
            row,
            field: field.to_string(),
            value: value.to_string(),
        })
}
