//! Contract test runner for core_types

mod test_contract_compliance;
