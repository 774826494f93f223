mod backfill;
mod stop_conditions;
