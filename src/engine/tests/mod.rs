mod tile_tests;
