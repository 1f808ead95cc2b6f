mod test_join_fanout;
