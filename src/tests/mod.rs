mod test_electorate;
mod test_trainer;
