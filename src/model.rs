use log::{debug, info};
use russcip::{Model, ObjSense, ProblemOrSolving, Status, VarType, Variable, WithSolutions};

use crate::data::{DAYS_PER_WEEK, DURATIONS_WEEKS, Equipment, MarketData, NUM_DURATIONS};

/// Revenue earned by one rental unit: rental length in days times the daily
/// rate published for that week and duration bucket.
fn unit_revenue(price: f64, duration_idx: usize) -> f64 {
    DURATIONS_WEEKS[duration_idx] as f64 * DAYS_PER_WEEK * price
}

/// Solved rental plan: solver status plus the realized decision values,
/// indexed `[equipment][week]` (and `[duration]` for rentals).
#[derive(Debug)]
pub struct RentalPlan {
    pub status: Status,
    pub objective: f64,
    pub rentals: Vec<Vec<[f64; NUM_DURATIONS]>>,
    pub inventory: Vec<Vec<f64>>,
    revenue: [f64; 3],
}

impl RentalPlan {
    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }

    pub fn revenue_for(&self, equipment: Equipment) -> f64 {
        self.revenue[equipment as usize]
    }

    pub fn total_revenue(&self) -> f64 {
        self.revenue.iter().sum()
    }

    /// Rentals initiated in `week` across all duration buckets.
    pub fn total_rentals(&self, equipment: Equipment, week: usize) -> f64 {
        self.rentals[equipment as usize][week].iter().sum()
    }
}

/// Builds the rental revenue MILP and solves it with SCIP.
///
/// Variables: X[e,j,o] rentals of equipment e initiated in week j for
/// duration bucket o, and Inv[e,j] units on hand in week j, all
/// non-negative integers. Objective: maximize total rental revenue.
pub fn solve(market: &MarketData) -> RentalPlan {
    let num_weeks = market.num_weeks();

    let mut model = Model::new()
        .hide_output()
        .include_default_plugins()
        .create_prob("rental_revenue")
        .set_obj_sense(ObjSense::Maximize);

    // X[e][j][o], with the published daily rate folded into the objective.
    let mut x: Vec<Vec<Vec<Variable>>> = Vec::with_capacity(Equipment::ALL.len());
    // Inv[e][j], objective-neutral.
    let mut inv: Vec<Vec<Variable>> = Vec::with_capacity(Equipment::ALL.len());

    for equipment in Equipment::ALL {
        let table = market.table(equipment);
        let mut x_weeks = Vec::with_capacity(num_weeks);
        let mut inv_weeks = Vec::with_capacity(num_weeks);
        for week in 0..num_weeks {
            let x_week: Vec<Variable> = (0..NUM_DURATIONS)
                .map(|o| {
                    model.add_var(
                        0.,
                        f64::INFINITY,
                        unit_revenue(table.price[week][o], o),
                        &format!("x_{}_{}_{}w", equipment.name(), week, DURATIONS_WEEKS[o]),
                        VarType::Integer,
                    )
                })
                .collect();
            let inv_var = model.add_var(
                0.,
                f64::INFINITY,
                0.,
                &format!("inv_{}_{}", equipment.name(), week),
                VarType::Integer,
            );
            x_weeks.push(x_week);
            inv_weeks.push(inv_var);
        }
        x.push(x_weeks);
        inv.push(inv_weeks);
    }

    for (e, equipment) in Equipment::ALL.into_iter().enumerate() {
        let table = market.table(equipment);

        // Demand ceiling: X[e,j,o] <= published demand.
        for week in 0..num_weeks {
            for o in 0..NUM_DURATIONS {
                model.add_cons(
                    vec![&x[e][week][o]],
                    &[1.0],
                    -f64::INFINITY,
                    table.demand[week][o],
                    &format!("demand_{}_{}_{}w", equipment.name(), week, DURATIONS_WEEKS[o]),
                );
            }
        }

        // Inventory balance: week 0 starts from the initial fleet; later
        // weeks subtract last week's outgoing rentals and add back rentals
        // completing this week.
        let initial = market.initial_inventory[e];
        model.add_cons(
            vec![&inv[e][0]],
            &[1.0],
            initial,
            initial,
            &format!("balance_{}_0", equipment.name()),
        );
        for week in 1..num_weeks {
            let mut vars = vec![&inv[e][week], &inv[e][week - 1]];
            let mut coefs = vec![1.0, -1.0];
            for o in 0..NUM_DURATIONS {
                // One-week rentals leave and return within the same balance
                // step, so their outflow and return terms cancel.
                if DURATIONS_WEEKS[o] == 1 {
                    continue;
                }
                vars.push(&x[e][week - 1][o]);
                coefs.push(1.0);
                if week >= DURATIONS_WEEKS[o] {
                    vars.push(&x[e][week - DURATIONS_WEEKS[o]][o]);
                    coefs.push(-1.0);
                }
            }
            model.add_cons(
                vars,
                &coefs,
                0.,
                0.,
                &format!("balance_{}_{}", equipment.name(), week),
            );
        }

        // Capacity ceiling: total rentals started in a week cannot exceed
        // the units on hand that week.
        for week in 0..num_weeks {
            let mut vars: Vec<&Variable> = x[e][week].iter().collect();
            let mut coefs = vec![1.0; NUM_DURATIONS];
            vars.push(&inv[e][week]);
            coefs.push(-1.0);
            model.add_cons(
                vars,
                &coefs,
                -f64::INFINITY,
                0.,
                &format!("capacity_{}_{}", equipment.name(), week),
            );
        }
    }

    debug!(
        "built MILP: {} rental vars, {} inventory vars over {} weeks",
        Equipment::ALL.len() * num_weeks * NUM_DURATIONS,
        Equipment::ALL.len() * num_weeks,
        num_weeks
    );

    let solved = model.solve();
    let status = solved.status();
    info!("solver finished with status {status:?}");

    let mut rentals = vec![vec![[0.0; NUM_DURATIONS]; num_weeks]; Equipment::ALL.len()];
    let mut inventory = vec![vec![0.0; num_weeks]; Equipment::ALL.len()];
    let mut objective = 0.0;
    if let Some(sol) = solved.best_sol() {
        objective = sol.obj_val();
        for e in 0..Equipment::ALL.len() {
            for week in 0..num_weeks {
                for o in 0..NUM_DURATIONS {
                    rentals[e][week][o] = sol.val(&x[e][week][o]);
                }
                inventory[e][week] = sol.val(&inv[e][week]);
            }
        }
    }

    // Recompute revenue per equipment type from the solution values; on an
    // optimal solution these sum back to the objective.
    let mut revenue = [0.0; 3];
    for (e, equipment) in Equipment::ALL.into_iter().enumerate() {
        let table = market.table(equipment);
        for week in 0..num_weeks {
            for o in 0..NUM_DURATIONS {
                revenue[e] += unit_revenue(table.price[week][o], o) * rentals[e][week][o];
            }
        }
    }

    RentalPlan {
        status,
        objective,
        rentals,
        inventory,
        revenue,
    }
}
