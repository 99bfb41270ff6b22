// ==========================================
// 家禽生产分析系统 - 经济核算引擎
// ==========================================
// 职责:
// 1. 蛋鸡日经济: 饲料成本 / 蛋收入 / 利润 / 保本蛋重量
// 2. 最优饲养周期建议
// 3. 出栏销售结算 (活禽 / 冻品 / 混合)
// 4. 生物资产估值 (雏鸡成本 + 累计转化成本)
// ==========================================

use crate::domain::batch::{Batch, CostSnapshot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

// ==========================================
// 蛋鸡日经济
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDailyInput {
    pub batch_id: String,
    pub date: NaiveDate,
    pub feed_consumed_kg: f64,
    pub feed_cost_per_kg: f64,
    pub egg_mass_g: f64,
    pub egg_price_per_kg: f64,
    pub other_costs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDailyEconomics {
    pub batch_id: String,
    pub date: NaiveDate,
    pub feed_cost: f64,
    pub other_costs: f64,
    pub total_costs: f64,
    pub egg_revenue: f64,
    pub profit: f64,
    pub break_even_egg_mass_g: f64, // 蛋价为 0 时为 0
    pub is_profitable: bool,
}

/// 周利润 (周期建议输入)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProfit {
    pub week: i64,
    pub profit: f64,
}

// ==========================================
// 销售结算
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleType {
    Live,   // 活禽
    Frozen, // 屠宰冷冻
    Mixed,  // 混合
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleType::Live => write!(f, "LIVE"),
            SaleType::Frozen => write!(f, "FROZEN"),
            SaleType::Mixed => write!(f, "MIXED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub sale_type: SaleType,
    pub live_birds: u32,
    pub frozen_birds: u32,
    pub average_weight_kg: f64,
    pub live_price_per_kg: f64,
    pub frozen_price_per_kg: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleSettlement {
    pub sale_type: SaleType,
    pub live_birds: u32,
    pub frozen_birds: u32,
    pub total_weight_kg: f64,
    pub live_revenue: f64,
    pub frozen_revenue: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub margin_pct: f64, // 成本为 0 时为 0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub sale_count: usize,
    pub total_birds: u64,
    pub total_weight_kg: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub margin_pct: f64,
}

// ==========================================
// 生物资产估值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiologicalAssetValuation {
    pub batch_id: String,
    pub as_of: Option<NaiveDate>,
    pub chick_cost: f64,
    pub cumulative_transformation_cost: f64,
    pub carrying_value: f64,
    pub live_birds: u32,
    pub value_per_bird: f64,
}

// ==========================================
// EconomicsCalculator
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicsCalculator;

impl EconomicsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 蛋鸡日经济
    pub fn layer_daily(&self, input: &LayerDailyInput) -> LayerDailyEconomics {
        let feed_cost = input.feed_consumed_kg * input.feed_cost_per_kg;
        let total_costs = feed_cost + input.other_costs;
        let egg_revenue = input.egg_mass_g / 1000.0 * input.egg_price_per_kg;
        let profit = egg_revenue - total_costs;
        let break_even_egg_mass_g = if input.egg_price_per_kg > 0.0 {
            total_costs / input.egg_price_per_kg * 1000.0
        } else {
            0.0
        };

        LayerDailyEconomics {
            batch_id: input.batch_id.clone(),
            date: input.date,
            feed_cost,
            other_costs: input.other_costs,
            total_costs,
            egg_revenue,
            profit,
            break_even_egg_mass_g,
            is_profitable: profit >= 0.0,
        }
    }

    /// 最优周期: 下一周利润下降或转负时取当前周,否则取最后一周
    pub fn optimal_cycle_length(&self, weekly: &[WeeklyProfit]) -> Option<i64> {
        weekly
            .windows(2)
            .find(|w| w[1].profit < w[0].profit || w[1].profit < 0.0)
            .map(|w| w[0].week)
            .or_else(|| weekly.last().map(|w| w.week))
    }

    /// 出栏销售结算
    #[instrument(skip(self, request), fields(sale_type = %request.sale_type))]
    pub fn settle_sale(&self, request: &SaleRequest) -> SaleSettlement {
        let live_birds = match request.sale_type {
            SaleType::Frozen => 0,
            _ => request.live_birds,
        };
        let frozen_birds = match request.sale_type {
            SaleType::Live => 0,
            _ => request.frozen_birds,
        };

        let live_revenue = live_birds as f64 * request.average_weight_kg * request.live_price_per_kg;
        let frozen_revenue =
            frozen_birds as f64 * request.average_weight_kg * request.frozen_price_per_kg;
        let total_revenue = live_revenue + frozen_revenue;
        let profit = total_revenue - request.total_cost;

        debug!(total_revenue, profit, "销售结算完成");

        SaleSettlement {
            sale_type: request.sale_type,
            live_birds,
            frozen_birds,
            total_weight_kg: (live_birds as f64 + frozen_birds as f64) * request.average_weight_kg,
            live_revenue,
            frozen_revenue,
            total_revenue,
            total_cost: request.total_cost,
            profit,
            margin_pct: margin(profit, request.total_cost),
        }
    }

    /// 多笔销售汇总
    pub fn sales_totals(&self, settlements: &[SaleSettlement]) -> SalesTotals {
        let mut totals = settlements.iter().fold(SalesTotals::default(), |mut acc, s| {
            acc.sale_count += 1;
            acc.total_birds += s.live_birds as u64 + s.frozen_birds as u64;
            acc.total_weight_kg += s.total_weight_kg;
            acc.total_revenue += s.total_revenue;
            acc.total_cost += s.total_cost;
            acc.total_profit += s.profit;
            acc
        });
        totals.margin_pct = margin(totals.total_profit, totals.total_cost);
        totals
    }

    /// 生物资产估值
    pub fn value_biological_asset(
        &self,
        batch: &Batch,
        latest_snapshot: Option<&CostSnapshot>,
    ) -> BiologicalAssetValuation {
        self.value_at_cost(
            batch,
            latest_snapshot.map_or(0.0, |s| s.cumulative_transformation_cost),
            latest_snapshot.map(|s| s.date),
        )
    }

    /// 按给定累计转化成本估值 (成本来自快照或日报估算)
    pub fn value_at_cost(
        &self,
        batch: &Batch,
        cumulative: f64,
        as_of: Option<NaiveDate>,
    ) -> BiologicalAssetValuation {
        let chick_cost = batch.chick_cost();
        let carrying_value = chick_cost + cumulative;
        let value_per_bird = if batch.current_bird_count > 0 {
            carrying_value / batch.current_bird_count as f64
        } else {
            0.0
        };

        BiologicalAssetValuation {
            batch_id: batch.id.clone(),
            as_of,
            chick_cost,
            cumulative_transformation_cost: cumulative,
            carrying_value,
            live_birds: batch.current_bird_count,
            value_per_bird,
        }
    }
}

fn margin(profit: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        profit / cost * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BatchStatus, GeneticLine, ProductionType};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn daily(egg_mass_g: f64, price: f64) -> LayerDailyInput {
        LayerDailyInput {
            batch_id: "P1".into(),
            date: date(),
            feed_consumed_kg: 110.0,
            feed_cost_per_kg: 8.0,
            egg_mass_g,
            egg_price_per_kg: price,
            other_costs: 120.0,
        }
    }

    #[test]
    fn test_layer_daily_break_even() {
        let calc = EconomicsCalculator::new();
        // 成本 880 + 120 = 1000, 蛋价 40/kg → 保本 25000g
        let econ = calc.layer_daily(&daily(30000.0, 40.0));
        assert_eq!(econ.total_costs, 1000.0);
        assert_eq!(econ.egg_revenue, 1200.0);
        assert_eq!(econ.profit, 200.0);
        assert_eq!(econ.break_even_egg_mass_g, 25000.0);
        assert!(econ.is_profitable);

        let zero_price = calc.layer_daily(&daily(30000.0, 0.0));
        assert_eq!(zero_price.break_even_egg_mass_g, 0.0);
        assert!(!zero_price.is_profitable);
    }

    #[test]
    fn test_optimal_cycle_length() {
        let calc = EconomicsCalculator::new();
        let wp = |week, profit| WeeklyProfit { week, profit };

        assert_eq!(calc.optimal_cycle_length(&[]), None);
        assert_eq!(calc.optimal_cycle_length(&[wp(20, 5.0)]), Some(20));
        assert_eq!(
            calc.optimal_cycle_length(&[wp(20, 5.0), wp(21, 8.0), wp(22, 7.0)]),
            Some(21)
        );
        assert_eq!(
            calc.optimal_cycle_length(&[wp(20, 5.0), wp(21, 8.0), wp(22, 9.0)]),
            Some(22)
        );
    }

    #[test]
    fn test_settle_mixed_sale() {
        let calc = EconomicsCalculator::new();
        let s = calc.settle_sale(&SaleRequest {
            sale_type: SaleType::Mixed,
            live_birds: 600,
            frozen_birds: 400,
            average_weight_kg: 2.5,
            live_price_per_kg: 67.0,
            frozen_price_per_kg: 105.0,
            total_cost: 150000.0,
        });
        assert_eq!(s.total_weight_kg, 2500.0);
        assert_eq!(s.live_revenue, 100500.0);
        assert_eq!(s.frozen_revenue, 105000.0);
        assert_eq!(s.profit, 55500.0);
        assert!((s.margin_pct - 37.0).abs() < 1e-9);
    }

    #[test]
    fn test_settle_live_ignores_frozen_birds() {
        let calc = EconomicsCalculator::new();
        let s = calc.settle_sale(&SaleRequest {
            sale_type: SaleType::Live,
            live_birds: 100,
            frozen_birds: 50,
            average_weight_kg: 2.0,
            live_price_per_kg: 10.0,
            frozen_price_per_kg: 20.0,
            total_cost: 0.0,
        });
        assert_eq!(s.frozen_birds, 0);
        assert_eq!(s.total_revenue, 2000.0);
        assert_eq!(s.margin_pct, 0.0);

        let totals = calc.sales_totals(&[s.clone(), s]);
        assert_eq!(totals.sale_count, 2);
        assert_eq!(totals.total_birds, 200);
        assert_eq!(totals.total_revenue, 4000.0);
    }

    fn valued_batch() -> Batch {
        Batch {
            id: "L1".into(),
            production_type: ProductionType::Broiler,
            genetic_line: GeneticLine::Cobb500,
            start_date: date(),
            birth_date: None,
            initial_bird_count: 1000,
            current_bird_count: 800,
            unit_chick_cost: 12.0,
            status: BatchStatus::Active,
            finish_date: None,
        }
    }

    #[test]
    fn test_biological_asset_valuation() {
        let batch = valued_batch();
        let snapshot = CostSnapshot {
            batch_id: "L1".into(),
            date: date(),
            feed_cost: 0.0,
            vaccine_cost: 0.0,
            allocated_overhead: 0.0,
            cumulative_transformation_cost: 4000.0,
        };
        let v = EconomicsCalculator::new().value_biological_asset(&batch, Some(&snapshot));
        assert_eq!(v.carrying_value, 16000.0);
        assert_eq!(v.value_per_bird, 20.0);

        let none = EconomicsCalculator::new().value_biological_asset(&batch, None);
        assert_eq!(none.carrying_value, 12000.0);
    }

    #[test]
    fn test_value_at_estimated_cost() {
        let mut batch = valued_batch();
        batch.current_bird_count = 500;
        let v = EconomicsCalculator::new().value_at_cost(&batch, 3000.0, None);
        assert_eq!(v.chick_cost, 12000.0);
        assert_eq!(v.cumulative_transformation_cost, 3000.0);
        assert_eq!(v.carrying_value, 15000.0);
        assert_eq!(v.value_per_bird, 30.0);
        assert!(v.as_of.is_none());
    }
}
